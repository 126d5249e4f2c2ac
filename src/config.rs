//! Configuration for kdict
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;

use crate::error::{KdictError, Result};

/// Smallest and largest accepted `bucket_bits`
pub const MIN_BUCKET_BITS: u32 = 0;
pub const MAX_BUCKET_BITS: u32 = 16;

/// Main configuration for a kdict instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Table Configuration
    // -------------------------------------------------------------------------
    /// log2 of the bucket count. Fixed for the lifetime of the store;
    /// the table never resizes, chains just grow longer.
    pub bucket_bits: u32,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Accepted connections that may wait for a free worker before
    /// new ones are refused
    pub max_pending_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_bits: 8, // 256 buckets
            listen_addr: "127.0.0.1:7878".to_string(),
            worker_threads: 4,
            max_pending_connections: 64,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Number of hash buckets implied by `bucket_bits`
    pub fn bucket_count(&self) -> usize {
        1usize << self.bucket_bits
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        if !(MIN_BUCKET_BITS..=MAX_BUCKET_BITS).contains(&self.bucket_bits) {
            return Err(KdictError::Config(format!(
                "bucket_bits must be within {}..={}, got {}",
                MIN_BUCKET_BITS, MAX_BUCKET_BITS, self.bucket_bits
            )));
        }
        if self.worker_threads == 0 {
            return Err(KdictError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_pending_connections == 0 {
            return Err(KdictError::Config(
                "max_pending_connections must be at least 1".to_string(),
            ));
        }
        self.listen_addr.parse::<SocketAddr>().map_err(|e| {
            KdictError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })?;
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set log2 of the bucket count
    pub fn bucket_bits(mut self, bits: u32) -> Self {
        self.config.bucket_bits = bits;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set how many accepted connections may queue for a worker
    pub fn max_pending_connections(mut self, count: usize) -> Self {
        self.config.max_pending_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
