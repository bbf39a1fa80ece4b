//! Mutable view over a borrowed byte region.

use crate::error::{BufferError, BufferResult};
use crate::primitive::Primitive;
use crate::reader::ReadBuf;

/// A mutable, bounds-checked view over a caller-owned byte slice.
///
/// The view never grows the slice; writes past the end fail with
/// [`BufferError::CapacityExceeded`] and leave the slice untouched.
#[derive(Debug)]
pub struct WriteBuf<'a> {
    data: &'a mut [u8],
}

impl<'a> WriteBuf<'a> {
    /// Wraps a mutable byte slice.
    #[must_use]
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data }
    }

    /// Returns the capacity of the wrapped slice.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Verifies that `len` bytes starting at `offset` are writable.
    pub fn check(&self, offset: usize, len: usize) -> BufferResult<()> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(()),
            _ => Err(BufferError::CapacityExceeded {
                offset,
                requested: len,
                capacity: self.data.len(),
            }),
        }
    }

    /// Writes a little-endian scalar at `offset`.
    #[inline]
    pub fn put<T: Primitive>(&mut self, offset: usize, value: T) -> BufferResult<()> {
        self.check(offset, T::SIZE)?;
        value.write_le(&mut self.data[offset..]);
        Ok(())
    }

    /// Copies `src` into the buffer starting at `offset`.
    #[inline]
    pub fn put_bytes(&mut self, offset: usize, src: &[u8]) -> BufferResult<()> {
        self.check(offset, src.len())?;
        self.data[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Fills `len` bytes starting at `offset` with zeros.
    pub fn zero(&mut self, offset: usize, len: usize) -> BufferResult<()> {
        self.check(offset, len)?;
        self.data[offset..offset + len].fill(0);
        Ok(())
    }

    /// Returns a read-only view over the same bytes.
    #[must_use]
    pub fn as_read(&self) -> ReadBuf<'_> {
        ReadBuf::new(self.data)
    }
}
