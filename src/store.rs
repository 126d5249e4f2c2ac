//! Store Module
//!
//! The hash index behind a single exclusive lock, plus its lifecycle.
//!
//! ## Responsibilities
//! - Serialize every read and write against the index
//! - Keep the critical section to in-memory table work only
//! - Release all entries at teardown and refuse requests afterwards

use parking_lot::Mutex;

use crate::config::{Config, MAX_BUCKET_BITS, MIN_BUCKET_BITS};
use crate::error::{KdictError, Result};
use crate::table::{HashIndex, Key, Value};

/// The dictionary and its lock
///
/// ## Concurrency Model: one exclusive lock
///
/// - **Set** and **Get** both take `table`; there is no shared read path,
///   so every Get observes every Set that completed before it.
/// - The lock parks waiting threads instead of spinning.
/// - Callers copy request data in before calling and copy results out after
///   the call returns; nothing here touches caller memory.
///
/// ## Teardown
///
/// `teardown()` takes the same lock, so it waits for any operation already
/// inside it, then drops every entry. The table slot stays `None` from then
/// on and later calls fail with `ShuttingDown`.
pub struct Store {
    /// `None` once torn down
    table: Mutex<Option<HashIndex>>,

    bucket_count: usize,
}

impl Store {
    /// Create an empty store with `2^bucket_bits` buckets
    pub fn new(bucket_bits: u32) -> Result<Self> {
        if !(MIN_BUCKET_BITS..=MAX_BUCKET_BITS).contains(&bucket_bits) {
            return Err(KdictError::Config(format!(
                "bucket_bits must be within {}..={}, got {}",
                MIN_BUCKET_BITS, MAX_BUCKET_BITS, bucket_bits
            )));
        }

        let index = HashIndex::new(bucket_bits);
        let bucket_count = index.bucket_count();
        tracing::debug!("Store initialized with {} buckets", bucket_count);

        Ok(Self {
            table: Mutex::new(Some(index)),
            bucket_count,
        })
    }

    /// Create a store sized by `config`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::new(config.bucket_bits)
    }

    /// Insert or overwrite `key`
    pub fn set(&self, key: &Key, value: &Value) -> Result<()> {
        let mut table = self.table.lock();
        let index = table.as_mut().ok_or(KdictError::ShuttingDown)?;
        index.upsert(key, value)
    }

    /// Copy out the value stored under `key`
    pub fn get(&self, key: &Key) -> Result<Value> {
        let table = self.table.lock();
        let index = table.as_ref().ok_or(KdictError::ShuttingDown)?;
        index
            .find(key)
            .map(|entry| *entry.value())
            .ok_or(KdictError::NotFound)
    }

    /// Release every entry and refuse all later requests
    ///
    /// Returns the number of entries released. Calling it again is a no-op
    /// that returns 0.
    pub fn teardown(&self) -> usize {
        let released = self.table.lock().take();
        match released {
            Some(index) => {
                let count = index.debug_entry_count();
                drop(index);
                tracing::info!("Store torn down, {} entries released", count);
                count
            }
            None => 0,
        }
    }

    /// Whether `teardown()` has run
    pub fn is_torn_down(&self) -> bool {
        self.table.lock().is_none()
    }

    /// Number of buckets in the index
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    // =========================================================================
    // Instrumentation (tests and debugging only, not part of the store API)
    // =========================================================================

    #[doc(hidden)]
    pub fn debug_entry_count(&self) -> usize {
        self.table
            .lock()
            .as_ref()
            .map_or(0, HashIndex::debug_entry_count)
    }

    #[doc(hidden)]
    pub fn debug_longest_chain(&self) -> usize {
        self.table
            .lock()
            .as_ref()
            .map_or(0, HashIndex::debug_longest_chain)
    }
}
