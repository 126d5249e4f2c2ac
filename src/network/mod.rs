//! Network Module
//!
//! TCP transport: server, per-connection handling, and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - Worker thread pool for connections
//! - Requests routed through the Dispatcher

mod server;
mod connection;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use client::Client;
