//! Fixed-capacity, null-terminated byte buffers
//!
//! A `BoundedBuf<N>` always holds exactly `N` bytes. Its data is the run of
//! bytes before the first NUL, which is at most `N - 1` bytes long because
//! the last byte is always a terminator. Everything after the data is zero,
//! so two buffers holding the same data compare equal byte-for-byte.

use std::fmt;

/// Fixed-capacity byte buffer with guaranteed null termination
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundedBuf<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> BoundedBuf<N> {
    /// Total capacity, terminator included
    pub const CAPACITY: usize = N;

    /// Longest data run the buffer can hold
    pub const MAX_LEN: usize = N - 1;

    /// Create an empty (all-zero) buffer
    pub fn new() -> Self {
        Self { bytes: [0u8; N] }
    }

    /// Build a buffer from caller-supplied bytes
    ///
    /// Copies up to the first NUL in `raw` or `MAX_LEN` bytes, whichever
    /// comes first. Longer input is silently truncated; it is never an error.
    pub fn from_raw(raw: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.fill_from(raw);
        buf
    }

    /// Replace the contents with caller-supplied bytes (see [`from_raw`](Self::from_raw))
    pub fn fill_from(&mut self, raw: &[u8]) {
        let len = raw
            .iter()
            .take(Self::MAX_LEN)
            .position(|&b| b == 0)
            .unwrap_or_else(|| raw.len().min(Self::MAX_LEN));

        self.bytes = [0u8; N];
        self.bytes[..len].copy_from_slice(&raw[..len]);
        self.terminate();
    }

    /// Full replace with the contents of another buffer
    pub fn assign(&mut self, other: &Self) {
        self.bytes = other.bytes;
        self.terminate();
    }

    /// Force the final byte to NUL
    pub fn terminate(&mut self) {
        self.bytes[N - 1] = 0;
    }

    /// Length of the data run (bytes before the first NUL)
    pub fn len(&self) -> usize {
        self.bytes.iter().position(|&b| b == 0).unwrap_or(N)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes[0] == 0
    }

    /// The data bytes, without terminator or padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The whole fixed-size buffer, padding included
    pub fn as_raw(&self) -> &[u8; N] {
        &self.bytes
    }
}

impl<const N: usize> Default for BoundedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> From<&str> for BoundedBuf<N> {
    fn from(s: &str) -> Self {
        Self::from_raw(s.as_bytes())
    }
}

impl<const N: usize> From<&[u8]> for BoundedBuf<N> {
    fn from(raw: &[u8]) -> Self {
        Self::from_raw(raw)
    }
}

impl<const N: usize> fmt::Debug for BoundedBuf<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundedBuf<{}>({:?})", N, String::from_utf8_lossy(self.as_bytes()))
    }
}
