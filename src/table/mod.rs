//! Table Module
//!
//! The in-memory dictionary: bounded key/value buffers and the hash index
//! that owns every entry.
//!
//! ## Responsibilities
//! - Truncate and null-terminate caller data into fixed-capacity buffers
//! - Hash keys and place entries into a fixed number of buckets
//! - Insert-or-overwrite and exact-match lookup
//!
//! ## Data Structure Choice
//! A fixed array of `2^bits` buckets, each a chain of entries:
//! - The bucket count never changes after construction
//! - Many distinct keys make chains longer rather than failing; this is the
//!   known scaling limit of the table
//! - No delete, no iteration
//!
//! The table itself is not synchronized; see [`crate::store::Store`].

mod bounded;
mod hash;
mod index;

pub use bounded::BoundedBuf;
pub use hash::{bucket_index, jhash, JHASH_INITVAL};
pub use index::{Entry, HashIndex};

/// Key buffer capacity in bytes, terminator included
pub const KEY_CAPACITY: usize = 64;

/// Value buffer capacity in bytes, terminator included
pub const VALUE_CAPACITY: usize = 256;

/// A key: at most 63 data bytes plus terminator
pub type Key = BoundedBuf<KEY_CAPACITY>;

/// A value: at most 255 data bytes plus terminator
pub type Value = BoundedBuf<VALUE_CAPACITY>;
