//! Read-only view over a borrowed byte region.

use crate::error::{BufferError, BufferResult};
use crate::primitive::Primitive;

/// A read-only, bounds-checked view over a byte slice.
///
/// All offsets are absolute positions within the wrapped slice. The view is
/// `Copy`, so slices handed out by [`bytes`](Self::bytes) carry the lifetime
/// of the source buffer rather than of the view.
#[derive(Debug, Clone, Copy)]
pub struct ReadBuf<'a> {
    data: &'a [u8],
}

impl<'a> ReadBuf<'a> {
    /// Wraps a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Returns the length of the wrapped slice.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the wrapped slice is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the wrapped slice.
    #[must_use]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Verifies that `len` bytes starting at `offset` are readable.
    pub fn check(&self, offset: usize, len: usize) -> BufferResult<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(BufferError::UnexpectedEof {
                offset,
                requested: len,
                available: self.data.len(),
            }),
        }
    }

    /// Reads a little-endian scalar at `offset`.
    #[inline]
    pub fn get<T: Primitive>(&self, offset: usize) -> BufferResult<T> {
        self.check(offset, T::SIZE)?;
        Ok(T::read_le(&self.data[offset..]))
    }

    /// Borrows `len` bytes starting at `offset`.
    #[inline]
    pub fn bytes(&self, offset: usize, len: usize) -> BufferResult<&'a [u8]> {
        self.check(offset, len)?;
        Ok(&self.data[offset..offset + len])
    }
}
