//! Error types for kdict
//!
//! Provides a unified error type for all operations, plus the mapping
//! between errors and the numeric status codes carried on the wire.

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using KdictError
pub type Result<T> = std::result::Result<T, KdictError>;

/// Unified error type for kdict operations
#[derive(Debug, Error)]
pub enum KdictError {
    // -------------------------------------------------------------------------
    // Request Errors (terminal for the request that triggered them)
    // -------------------------------------------------------------------------
    #[error("No such control operation: 0x{code:08x}")]
    BadOperation { code: u32 },

    #[error("Bad address: {0}")]
    TransferFault(String),

    #[error("No such entry")]
    NotFound,

    #[error("Out of memory")]
    OutOfMemory,

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    #[error("Store has been torn down")]
    ShuttingDown,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Remote(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl KdictError {
    /// Status code reported to the caller for this error
    pub fn status(&self) -> Status {
        match self {
            KdictError::BadOperation { .. } => Status::BadOperation,
            KdictError::TransferFault(_) => Status::Fault,
            KdictError::NotFound => Status::NotFound,
            KdictError::OutOfMemory => Status::OutOfMemory,
            KdictError::ShuttingDown => Status::NoDevice,
            KdictError::Io(_)
            | KdictError::Protocol(_)
            | KdictError::Remote(_)
            | KdictError::Config(_) => Status::Error,
        }
    }

    /// Negated errno value, as a control call would return it
    pub fn errno(&self) -> i32 {
        -(self.status() as u8 as i32)
    }

    /// Rebuild an error from a non-OK status received from a server
    ///
    /// `code` is the control code the request carried; `message` is the
    /// payload of a `Status::Error` response, if any.
    pub fn from_status(status: Status, code: u32, message: Option<&[u8]>) -> Self {
        match status {
            Status::BadOperation => KdictError::BadOperation { code },
            Status::Fault => KdictError::TransferFault("rejected by server".to_string()),
            Status::NotFound => KdictError::NotFound,
            Status::OutOfMemory => KdictError::OutOfMemory,
            Status::NoDevice => KdictError::ShuttingDown,
            Status::Ok | Status::Error => KdictError::Remote(
                message
                    .map(|m| String::from_utf8_lossy(m).into_owned())
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
        }
    }
}
