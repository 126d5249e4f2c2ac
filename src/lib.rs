//! # kdict
//!
//! A small in-memory dictionary of short key/value strings with:
//! - Fixed-capacity, always null-terminated keys (64) and values (256)
//! - A fixed-bucket Jenkins-hashed table with chaining
//! - One exclusive lock serializing every read and write
//! - Two ioctl-style control operations, SET and GET
//! - A framed TCP transport and client
//!
//! Nothing is persisted; all entries go away when the store is torn down.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Transport (TCP Server)                      │
//! │                    (Multiple Clients)                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  code + caller record
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Dispatcher                              │
//! │        (decode code, copy in, truncate, copy out)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Key / Value
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Store                                 │
//! │                   (single Mutex)                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!                ┌─────────────┐
//!                │  HashIndex  │
//!                │ (2^n chains)│
//!                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod table;
pub mod store;
pub mod protocol;
pub mod dispatcher;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KdictError, Result};
pub use config::Config;
pub use store::Store;
pub use dispatcher::Dispatcher;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kdict
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
