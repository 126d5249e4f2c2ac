//! Response definitions
//!
//! Represents responses to clients.

use crate::error::KdictError;

/// Response status codes (errno values, 255 for anything else)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    NotFound = 2,
    OutOfMemory = 12,
    Fault = 14,
    NoDevice = 19,
    BadOperation = 25,
    Error = 255,
}

impl Status {
    /// Parse a status byte
    pub fn from_u8(byte: u8) -> Option<Status> {
        match byte {
            0 => Some(Status::Ok),
            2 => Some(Status::NotFound),
            12 => Some(Status::OutOfMemory),
            14 => Some(Status::Fault),
            19 => Some(Status::NoDevice),
            25 => Some(Status::BadOperation),
            255 => Some(Status::Error),
            _ => None,
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (Pair for GET, error message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Response for a failed request
    ///
    /// Request errors carry only their status; anything else becomes an
    /// ERROR with the message attached.
    pub fn from_error(err: &KdictError) -> Self {
        match err.status() {
            Status::Error => Self::error(&err.to_string()),
            status => Self {
                status,
                payload: None,
            },
        }
    }
}
