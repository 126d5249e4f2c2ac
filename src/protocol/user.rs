//! Access to caller-owned memory
//!
//! The dispatcher never touches a caller's record directly. It copies the
//! record in before taking the store lock and copies the result out after
//! releasing it, through this trait. A transport implements it for whatever
//! holds the caller's bytes.

use crate::error::{KdictError, Result};

/// Caller memory that a request record is read from and written back to
pub trait UserBuffer {
    /// Fill `dst` from the start of the caller's buffer
    fn copy_in(&self, dst: &mut [u8]) -> Result<()>;

    /// Write `src` over the start of the caller's buffer
    fn copy_out(&mut self, src: &[u8]) -> Result<()>;
}

impl UserBuffer for [u8] {
    fn copy_in(&self, dst: &mut [u8]) -> Result<()> {
        if self.len() < dst.len() {
            return Err(KdictError::TransferFault(format!(
                "cannot read {} bytes from a {} byte buffer",
                dst.len(),
                self.len()
            )));
        }
        dst.copy_from_slice(&self[..dst.len()]);
        Ok(())
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<()> {
        if self.len() < src.len() {
            return Err(KdictError::TransferFault(format!(
                "cannot write {} bytes to a {} byte buffer",
                src.len(),
                self.len()
            )));
        }
        self[..src.len()].copy_from_slice(src);
        Ok(())
    }
}

impl UserBuffer for Vec<u8> {
    fn copy_in(&self, dst: &mut [u8]) -> Result<()> {
        self.as_slice().copy_in(dst)
    }

    fn copy_out(&mut self, src: &[u8]) -> Result<()> {
        self.as_mut_slice().copy_out(src)
    }
}
