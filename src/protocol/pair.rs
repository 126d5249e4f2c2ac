//! The fixed-layout request/response record

use std::fmt;

use crate::table::{Key, Value, KEY_CAPACITY, VALUE_CAPACITY};

/// Size of a `Pair` on the wire: key bytes followed by value bytes
pub const PAIR_SIZE: usize = KEY_CAPACITY + VALUE_CAPACITY;

/// A request/response record exactly as the caller lays it out
///
/// Fields are raw: nothing guarantees they are null-terminated until the
/// dispatcher truncates them into a [`Key`] / [`Value`].
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub key: [u8; KEY_CAPACITY],
    pub value: [u8; VALUE_CAPACITY],
}

impl Pair {
    /// An all-zero record
    pub fn zeroed() -> Self {
        Self {
            key: [0u8; KEY_CAPACITY],
            value: [0u8; VALUE_CAPACITY],
        }
    }

    /// Build a record the way a caller fills one in
    ///
    /// Bytes beyond a field's capacity are dropped; no terminator is
    /// added, so an over-long key or value arrives unterminated.
    pub fn new(key: &[u8], value: &[u8]) -> Self {
        let mut pair = Self::zeroed();
        let klen = key.len().min(KEY_CAPACITY);
        pair.key[..klen].copy_from_slice(&key[..klen]);
        let vlen = value.len().min(VALUE_CAPACITY);
        pair.value[..vlen].copy_from_slice(&value[..vlen]);
        pair
    }

    /// A record carrying only a key, as sent for a GET
    pub fn with_key(key: &[u8]) -> Self {
        Self::new(key, &[])
    }

    pub fn from_bytes(bytes: &[u8; PAIR_SIZE]) -> Self {
        let mut pair = Self::zeroed();
        pair.key.copy_from_slice(&bytes[..KEY_CAPACITY]);
        pair.value.copy_from_slice(&bytes[KEY_CAPACITY..]);
        pair
    }

    pub fn to_bytes(&self) -> [u8; PAIR_SIZE] {
        let mut bytes = [0u8; PAIR_SIZE];
        bytes[..KEY_CAPACITY].copy_from_slice(&self.key);
        bytes[KEY_CAPACITY..].copy_from_slice(&self.value);
        bytes
    }

    /// Key field truncated and terminated
    pub fn key(&self) -> Key {
        Key::from_raw(&self.key)
    }

    /// Value field truncated and terminated
    pub fn value(&self) -> Value {
        Value::from_raw(&self.value)
    }

    /// Force a terminator into the last key byte, leaving the rest as-is
    pub fn terminate_key(&mut self) {
        self.key[KEY_CAPACITY - 1] = 0;
    }

    /// Reset the value field to zero, copy `value` in, and terminate it
    pub fn fill_value(&mut self, value: &Value) {
        self.value = [0u8; VALUE_CAPACITY];
        let data = value.as_bytes();
        self.value[..data.len()].copy_from_slice(data);
        self.value[VALUE_CAPACITY - 1] = 0;
    }
}

impl Default for Pair {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("key", &self.key())
            .field("value", &self.value())
            .finish()
    }
}
