//! Control code definitions
//!
//! Codes follow the Linux ioctl number layout:
//!
//! ```text
//! ┌─────────┬──────────────┬──────────┬──────────┐
//! │ Dir (2) │  Size (14)   │ Type (8) │  Nr (8)  │
//! └─────────┴──────────────┴──────────┴──────────┘
//!  31     30 29          16 15       8 7        0
//! ```

use crate::error::{KdictError, Result};
use super::pair::PAIR_SIZE;

/// Magic type byte shared by every kdict control code
pub const KDICT_IOC_MAGIC: u8 = b'k';

const NR_SHIFT: u32 = 0;
const TYPE_SHIFT: u32 = 8;
const SIZE_SHIFT: u32 = 16;
const DIR_SHIFT: u32 = 30;

const NR_MASK: u32 = 0xff;
const TYPE_MASK: u32 = 0xff;
const SIZE_MASK: u32 = 0x3fff;
const DIR_MASK: u32 = 0x3;

/// Caller writes data to the store
pub const DIR_WRITE: u32 = 1;
/// Caller reads data back from the store
pub const DIR_READ: u32 = 2;

/// A raw control code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCode(pub u32);

impl ControlCode {
    pub const fn new(dir: u32, kind: u8, nr: u8, size: usize) -> Self {
        Self(
            (dir & DIR_MASK) << DIR_SHIFT
                | (size as u32 & SIZE_MASK) << SIZE_SHIFT
                | (kind as u32) << TYPE_SHIFT
                | (nr as u32) << NR_SHIFT,
        )
    }

    pub const fn dir(self) -> u32 {
        (self.0 >> DIR_SHIFT) & DIR_MASK
    }

    pub const fn size(self) -> usize {
        ((self.0 >> SIZE_SHIFT) & SIZE_MASK) as usize
    }

    /// The magic/category byte
    pub const fn kind(self) -> u8 {
        ((self.0 >> TYPE_SHIFT) & TYPE_MASK) as u8
    }

    pub const fn nr(self) -> u8 {
        ((self.0 >> NR_SHIFT) & NR_MASK) as u8
    }
}

/// `_IOW('k', 1, Pair)`
pub const SET_CODE: u32 = ControlCode::new(DIR_WRITE, KDICT_IOC_MAGIC, 1, PAIR_SIZE).0;

/// `_IOWR('k', 2, Pair)`
pub const GET_CODE: u32 = ControlCode::new(DIR_READ | DIR_WRITE, KDICT_IOC_MAGIC, 2, PAIR_SIZE).0;

/// The two operations the dispatcher understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key's value
    Set,

    /// Read a key's value
    Get,
}

impl Command {
    /// Resolve a raw control code
    ///
    /// A foreign magic byte or any code other than the exact SET/GET
    /// codes is a `BadOperation`.
    pub fn decode(code: u32) -> Result<Command> {
        if ControlCode(code).kind() != KDICT_IOC_MAGIC {
            return Err(KdictError::BadOperation { code });
        }

        match code {
            SET_CODE => Ok(Command::Set),
            GET_CODE => Ok(Command::Get),
            _ => Err(KdictError::BadOperation { code }),
        }
    }

    /// The raw control code for this command
    pub fn code(&self) -> u32 {
        match self {
            Command::Set => SET_CODE,
            Command::Get => GET_CODE,
        }
    }
}
