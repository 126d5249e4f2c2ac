//! Protocol Module
//!
//! The fixed-layout request record, the control codes that select an
//! operation, and the framing used to carry both over a byte stream.
//!
//! ## Request Record
//! ```text
//! ┌──────────────────────┬──────────────────────────────────────┐
//! │      key (64)        │              value (256)             │
//! └──────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! ### Control Codes (ioctl-style, magic 'k')
//! - `_IOW('k', 1, Pair)`:  SET - caller writes key and value
//! - `_IOWR('k', 2, Pair)`: GET - caller writes key, reads back value
//!
//! ### Request Frame
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Code (4) │ Len (4)  │       Payload (Pair)        │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Response Frame
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes (errno values)
//! - 0:   OK
//! - 2:   ENOENT - no such entry
//! - 12:  ENOMEM - out of memory
//! - 14:  EFAULT - bad address
//! - 19:  ENODEV - store torn down
//! - 25:  ENOTTY - no such control operation
//! - 255: ERROR  - transport/server failure, payload is a message

mod command;
mod pair;
mod response;
mod user;
mod codec;

pub use command::{Command, ControlCode, KDICT_IOC_MAGIC, GET_CODE, SET_CODE};
pub use pair::{Pair, PAIR_SIZE};
pub use response::{Response, Status};
pub use user::UserBuffer;
pub use codec::{
    Request, encode_request, decode_request, encode_response, decode_response,
    read_request, write_request, read_response, write_response,
    REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
