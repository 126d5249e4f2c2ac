//! Dispatcher Module
//!
//! Turns a control call (code + caller buffer) into a store operation.
//!
//! ## Request Cycle
//! 1. Resolve the control code; unknown codes fail before any copy
//! 2. Copy the caller's record into a local `Pair`
//! 3. Truncate key (and value) into bounded buffers
//! 4. Run the store operation (the only step under the lock)
//! 5. For GET, build the response record and copy it back out
//!
//! Every call is independent; no state is kept between calls.

use std::sync::Arc;

use crate::error::Result;
use crate::protocol::{Command, Pair, UserBuffer, PAIR_SIZE};
use crate::store::Store;

/// Routes control calls to a [`Store`]
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<Store>,
}

impl Dispatcher {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Handle one control call against `arg`, the caller's record
    ///
    /// On success for GET, `arg` holds the full response record. On any
    /// failure `arg` is left as it was.
    pub fn dispatch<B>(&self, code: u32, arg: &mut B) -> Result<()>
    where
        B: UserBuffer + ?Sized,
    {
        match Command::decode(code)? {
            Command::Set => self.handle_set(arg),
            Command::Get => self.handle_get(arg),
        }
    }

    fn handle_set<B>(&self, arg: &mut B) -> Result<()>
    where
        B: UserBuffer + ?Sized,
    {
        let pair = copy_pair_in(arg)?;
        let key = pair.key();
        let value = pair.value();

        tracing::trace!("SET {:?}", key);
        self.store.set(&key, &value)
    }

    fn handle_get<B>(&self, arg: &mut B) -> Result<()>
    where
        B: UserBuffer + ?Sized,
    {
        let mut pair = copy_pair_in(arg)?;
        let key = pair.key();

        tracing::trace!("GET {:?}", key);
        let value = self.store.get(&key)?;

        // The caller's key bytes go back unchanged apart from the terminator
        pair.terminate_key();
        pair.fill_value(&value);
        arg.copy_out(&pair.to_bytes())
    }

    // =========================================================================
    // In-process convenience calls
    // =========================================================================

    /// SET through the full control path
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut record = Pair::new(key, value).to_bytes();
        self.dispatch(Command::Set.code(), &mut record[..])
    }

    /// GET through the full control path, returning the value's data bytes
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let mut record = Pair::with_key(key).to_bytes();
        self.dispatch(Command::Get.code(), &mut record[..])?;
        Ok(Pair::from_bytes(&record).value().as_bytes().to_vec())
    }

    /// The store this dispatcher serves
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}

/// Copy the caller's record into a local `Pair`
fn copy_pair_in<B>(arg: &B) -> Result<Pair>
where
    B: UserBuffer + ?Sized,
{
    let mut bytes = [0u8; PAIR_SIZE];
    arg.copy_in(&mut bytes)?;
    Ok(Pair::from_bytes(&bytes))
}
