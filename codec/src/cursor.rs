//! Forward-only cursors shared by a message and everything nested in it.
//!
//! A cursor pairs a borrowed buffer with `limit`, the first byte not yet
//! written or consumed. Fixed fields are addressed relative to their block's
//! start and never touch the cursor; group headers, group elements and
//! var-data frames are placed at `limit` and advance it. One cursor is
//! created per pass and threaded by `&mut` through every group and element
//! codec, so only one of them can move it at a time.

use buffer::{ReadBuf, WriteBuf};

use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;

/// Write cursor over a caller-owned output buffer.
#[derive(Debug)]
pub struct WriteCursor<'a> {
    buf: WriteBuf<'a>,
    limit: usize,
}

impl<'a> WriteCursor<'a> {
    /// Creates a cursor whose first free byte is `limit`.
    #[must_use]
    pub fn new(buf: &'a mut [u8], limit: usize) -> Self {
        Self {
            buf: WriteBuf::new(buf),
            limit,
        }
    }

    /// First byte not yet written.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Capacity of the underlying buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub(crate) fn buf(&mut self) -> &mut WriteBuf<'a> {
        &mut self.buf
    }

    pub(crate) fn read_view(&self) -> ReadBuf<'_> {
        self.buf.as_read()
    }

    /// Reserves `len` bytes at `limit` and returns where they start.
    ///
    /// The limit is unchanged if the buffer cannot hold them.
    pub(crate) fn reserve(&mut self, len: usize) -> CodecResult<usize> {
        self.buf.check(self.limit, len)?;
        let start = self.limit;
        self.limit += len;
        Ok(start)
    }
}

/// Read cursor over a borrowed input buffer.
///
/// Carries the decode limits and the running element count for the pass.
#[derive(Debug, Clone, Copy)]
pub struct ReadCursor<'a> {
    buf: ReadBuf<'a>,
    limit: usize,
    limits: CodecLimits,
    elements: usize,
}

impl<'a> ReadCursor<'a> {
    /// Creates a cursor whose first unconsumed byte is `limit`.
    #[must_use]
    pub const fn new(buf: &'a [u8], limit: usize, limits: CodecLimits) -> Self {
        Self {
            buf: ReadBuf::new(buf),
            limit,
            limits,
            elements: 0,
        }
    }

    /// First byte not yet consumed.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Limits applied to this pass.
    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    pub(crate) const fn buf(&self) -> &ReadBuf<'a> {
        &self.buf
    }

    /// Moves the limit back to `limit` and forgets counted elements.
    pub(crate) fn reset(&mut self, limit: usize) {
        self.limit = limit;
        self.elements = 0;
    }

    /// Consumes `len` bytes at `limit` and returns where they start.
    ///
    /// The limit is unchanged if the buffer does not hold them.
    pub(crate) fn consume(&mut self, len: usize) -> CodecResult<usize> {
        self.buf.check(self.limit, len)?;
        let start = self.limit;
        self.limit += len;
        Ok(start)
    }

    /// Counts `count` more group elements against the per-pass limit.
    pub(crate) fn count_elements(&mut self, count: usize) -> CodecResult<()> {
        let total = self.elements.saturating_add(count);
        if total > self.limits.max_total_elements {
            tracing::debug!(
                total,
                limit = self.limits.max_total_elements,
                "rejecting message: too many group elements"
            );
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::TotalElements,
                limit: self.limits.max_total_elements,
                actual: total,
            });
        }
        self.elements = total;
        Ok(())
    }
}
