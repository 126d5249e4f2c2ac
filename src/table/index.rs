//! HashIndex implementation
//!
//! Fixed bucket array with chaining.

use crate::error::{KdictError, Result};
use super::hash::{bucket_index, jhash};
use super::{Key, Value};

/// A stored key/value pair, owned by the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    key: Key,
    value: Value,
}

impl Entry {
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Hash table of entries keyed by their key bytes
///
/// The bucket count is `2^bits` and never changes. Lookups walk the whole
/// chain of a bucket and compare full keys, so colliding keys stay distinct.
pub struct HashIndex {
    buckets: Box<[Vec<Entry>]>,
    bits: u32,
}

impl HashIndex {
    /// Create an empty index with `2^bits` buckets (`bits <= 16`)
    pub fn new(bits: u32) -> Self {
        let buckets = (0..1usize << bits).map(|_| Vec::new()).collect();
        Self { buckets, bits }
    }

    /// Number of buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket_of(&self, key: &Key) -> usize {
        bucket_index(jhash(key.as_bytes(), 0), self.bits)
    }

    /// Find the entry whose key matches exactly
    pub fn find(&self, key: &Key) -> Option<&Entry> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|entry| entry.key == *key)
    }

    /// Overwrite the value of an existing entry, or insert a new one
    ///
    /// Fails with `OutOfMemory` only when a new entry is needed and its
    /// allocation cannot be made; the index is unchanged in that case.
    pub fn upsert(&mut self, key: &Key, value: &Value) -> Result<()> {
        let idx = self.bucket_of(key);
        let chain = &mut self.buckets[idx];

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == *key) {
            entry.value.assign(value);
            return Ok(());
        }

        chain.try_reserve(1).map_err(|_| KdictError::OutOfMemory)?;
        chain.push(Entry {
            key: *key,
            value: *value,
        });
        Ok(())
    }

    // =========================================================================
    // Instrumentation (tests and debugging only, not part of the table API)
    // =========================================================================

    #[doc(hidden)]
    pub fn debug_entry_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[doc(hidden)]
    pub fn debug_longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
