//! Length prefixes for variable-length fields.

use buffer::{BufferResult, ReadBuf, WriteBuf};

use crate::error::EncodeError;

/// Width of the unsigned little-endian length preceding a var-data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LengthPrefix {
    /// 2-byte prefix; 65535 is reserved as null.
    U16,
    /// 4-byte prefix.
    U32,
}

impl LengthPrefix {
    /// Null sentinel of the 2-byte prefix.
    pub const U16_NULL: u16 = 0xFFFF;

    /// Encoded width of the prefix in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Largest payload length the prefix may declare.
    #[must_use]
    pub const fn max_length(self) -> usize {
        match self {
            Self::U16 => 65534,
            Self::U32 => 1_073_741_824,
        }
    }

    /// Rejects lengths the prefix cannot carry.
    pub fn check_length(self, length: usize) -> Result<(), EncodeError> {
        if length > self.max_length() {
            return Err(EncodeError::LengthOverflow {
                length,
                max: self.max_length(),
            });
        }
        Ok(())
    }

    /// Reads the declared payload length at `offset`.
    pub fn read_length(self, buf: &ReadBuf<'_>, offset: usize) -> BufferResult<usize> {
        Ok(match self {
            Self::U16 => usize::from(buf.get::<u16>(offset)?),
            Self::U32 => buf.get::<u32>(offset)? as usize,
        })
    }

    /// Writes `length` at `offset`.
    ///
    /// The length is validated first; nothing is written on failure.
    pub fn write_length(
        self,
        buf: &mut WriteBuf<'_>,
        offset: usize,
        length: usize,
    ) -> Result<usize, EncodeError> {
        self.check_length(length)?;
        match self {
            // check_length bounds both casts
            Self::U16 => buf.put(offset, length as u16)?,
            Self::U32 => buf.put(offset, length as u32)?,
        }
        Ok(self.width())
    }
}
