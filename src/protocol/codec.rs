//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Code (4) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! The payload is the caller's record, passed through untouched. Its size is
//! only checked by the dispatcher, so a short record surfaces as a transfer
//! fault rather than a framing error.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{KdictError, Result};
use super::{Response, Status};

/// Request header: 4 bytes control code + 4 bytes length
pub const REQUEST_HEADER_SIZE: usize = 8;

/// Response header: 1 byte status + 4 bytes length
pub const RESPONSE_HEADER_SIZE: usize = 5;

/// Maximum payload size in either direction
pub const MAX_PAYLOAD_SIZE: u32 = 4096;

/// A control call as carried over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Raw control code
    pub code: u32,

    /// The caller's record
    pub payload: Vec<u8>,
}

impl Request {
    pub fn new(code: u32, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            code,
            payload: payload.into(),
        }
    }
}

fn check_payload_len(payload_len: usize, what: &str) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(KdictError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Format: code (4) + payload_len (4) + payload
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut message = BytesMut::with_capacity(REQUEST_HEADER_SIZE + request.payload.len());
    message.put_u32(request.code);
    message.put_u32(request.payload.len() as u32);
    message.put_slice(&request.payload);
    message.to_vec()
}

/// Decode a request from bytes
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    if bytes.len() < REQUEST_HEADER_SIZE {
        return Err(KdictError::Protocol(format!(
            "Incomplete request header: expected {} bytes, got {}",
            REQUEST_HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let code = buf.get_u32();
    let payload_len = buf.get_u32() as usize;
    check_payload_len(payload_len, "Request")?;

    if buf.remaining() < payload_len {
        return Err(KdictError::Protocol(format!(
            "Incomplete request payload: expected {} bytes, got {}",
            payload_len,
            buf.remaining()
        )));
    }

    Ok(Request {
        code,
        payload: buf[..payload_len].to_vec(),
    })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);

    let mut message = BytesMut::with_capacity(RESPONSE_HEADER_SIZE + payload.len());
    message.put_u8(response.status as u8);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.to_vec()
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    if bytes.len() < RESPONSE_HEADER_SIZE {
        return Err(KdictError::Protocol(format!(
            "Incomplete response header: expected {} bytes, got {}",
            RESPONSE_HEADER_SIZE,
            bytes.len()
        )));
    }

    let mut buf = bytes;
    let status_byte = buf.get_u8();
    let payload_len = buf.get_u32() as usize;
    check_payload_len(payload_len, "Response")?;

    if buf.remaining() < payload_len {
        return Err(KdictError::Protocol(format!(
            "Incomplete response payload: expected {} bytes, got {}",
            payload_len,
            buf.remaining()
        )));
    }

    let status = Status::from_u8(status_byte).ok_or_else(|| {
        KdictError::Protocol(format!("Unknown response status: {}", status_byte))
    })?;

    let payload = if payload_len > 0 {
        Some(buf[..payload_len].to_vec())
    } else {
        None
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame: a fixed header whose last 4 bytes are the payload length,
/// then the payload
fn read_frame<R: Read>(reader: &mut R, header_size: usize, what: &str) -> Result<Vec<u8>> {
    let mut frame = vec![0u8; header_size];
    reader.read_exact(&mut frame)?;

    let mut len_field = &frame[header_size - 4..];
    let payload_len = len_field.get_u32() as usize;
    check_payload_len(payload_len, what)?;

    frame.resize(header_size + payload_len, 0);
    if payload_len > 0 {
        reader.read_exact(&mut frame[header_size..])?;
    }
    Ok(frame)
}

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let frame = read_frame(reader, REQUEST_HEADER_SIZE, "Request")?;
    decode_request(&frame)
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    writer.write_all(&encode_request(request))?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader, RESPONSE_HEADER_SIZE, "Response")?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(&encode_response(response))?;
    writer.flush()?;
    Ok(())
}
