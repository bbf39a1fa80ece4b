//! Repeating group dimension header.

use buffer::{BufferResult, ReadBuf, WriteBuf};

/// Encoded size of a group dimension header.
pub const GROUP_HEADER_SIZE: usize = 4;

/// Largest element count a group may declare (65535 is the null sentinel).
pub const MAX_GROUP_COUNT: usize = 65534;

/// Largest element block length a group may declare.
pub const MAX_GROUP_BLOCK_LENGTH: usize = 65534;

/// The 4-byte header preceding every repeating group.
///
/// ```text
/// +------------------+------------------+
/// | block_length u16 | num_in_group u16 |
/// +------------------+------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GroupDimension {
    /// Fixed block length of every element.
    pub block_length: u16,
    /// Number of elements that follow.
    pub num_in_group: u16,
}

impl GroupDimension {
    /// Creates a dimension header.
    #[must_use]
    pub const fn new(block_length: u16, num_in_group: u16) -> Self {
        Self {
            block_length,
            num_in_group,
        }
    }

    /// Reads a dimension header at `offset`.
    pub fn read(buf: &ReadBuf<'_>, offset: usize) -> BufferResult<Self> {
        buf.check(offset, GROUP_HEADER_SIZE)?;
        Ok(Self {
            block_length: buf.get(offset)?,
            num_in_group: buf.get(offset + 2)?,
        })
    }

    /// Writes the dimension header at `offset`.
    pub fn write(&self, buf: &mut WriteBuf<'_>, offset: usize) -> BufferResult<usize> {
        buf.check(offset, GROUP_HEADER_SIZE)?;
        buf.put(offset, self.block_length)?;
        buf.put(offset + 2, self.num_in_group)?;
        Ok(GROUP_HEADER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::{BufferError, Primitive};

    #[test]
    fn limits_exclude_null_sentinel() {
        assert_eq!(MAX_GROUP_COUNT, usize::from(<u16 as Primitive>::MAX));
        assert_eq!(MAX_GROUP_BLOCK_LENGTH, usize::from(<u16 as Primitive>::MAX));
    }

    #[test]
    fn dimension_layout() {
        let mut buf = [0u8; GROUP_HEADER_SIZE];
        GroupDimension::new(12, 3)
            .write(&mut WriteBuf::new(&mut buf), 0)
            .unwrap();
        assert_eq!(buf, [12, 0, 3, 0]);
    }

    #[test]
    fn dimension_roundtrip_at_offset() {
        let mut buf = [0u8; 10];
        let dim = GroupDimension::new(0, 2);
        dim.write(&mut WriteBuf::new(&mut buf), 6).unwrap();
        assert_eq!(GroupDimension::read(&ReadBuf::new(&buf), 6).unwrap(), dim);
    }

    #[test]
    fn truncated_dimension_fails() {
        let buf = [0u8; 3];
        let err = GroupDimension::read(&ReadBuf::new(&buf), 0).unwrap_err();
        assert!(matches!(err, BufferError::UnexpectedEof { .. }));
    }

    #[test]
    fn short_write_leaves_buffer_untouched() {
        let mut buf = [0xAAu8; 3];
        assert!(GroupDimension::new(1, 1)
            .write(&mut WriteBuf::new(&mut buf), 0)
            .is_err());
        assert_eq!(buf, [0xAA; 3]);
    }
}
