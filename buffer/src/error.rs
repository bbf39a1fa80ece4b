//! Error types for buffer access.

use std::fmt;

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur while reading or writing a borrowed byte region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Absolute offset of the attempted read.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Length of the buffer.
        available: usize,
    },

    /// Attempted to write past the end of the buffer.
    CapacityExceeded {
        /// Absolute offset of the attempted write.
        offset: usize,
        /// Number of bytes to be written.
        requested: usize,
        /// Capacity of the buffer.
        capacity: usize,
    },
}

impl BufferError {
    /// Returns the absolute end position the failed access needed.
    #[must_use]
    pub const fn needed(&self) -> usize {
        match self {
            Self::UnexpectedEof {
                offset, requested, ..
            }
            | Self::CapacityExceeded {
                offset, requested, ..
            } => offset.saturating_add(*requested),
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                offset,
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes at offset {offset} but buffer is {available} bytes"
                )
            }
            Self::CapacityExceeded {
                offset,
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "attempted to write {requested} bytes at offset {offset} but buffer capacity is {capacity} bytes"
                )
            }
        }
    }
}

impl std::error::Error for BufferError {}
