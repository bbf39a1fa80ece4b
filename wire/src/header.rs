//! Outer message header.
//!
//! ```text
//! +------------------+------------------+------------------+------------------+
//! | block_length u16 | template_id u16  | schema_id u16    | version u16      |
//! +------------------+------------------+------------------+------------------+
//! ```
//!
//! All fields are little-endian. The header precedes the message's fixed
//! block and carries the *acting* block length and version a decoder must
//! honour instead of its own compiled constants.

use buffer::{Primitive, ReadBuf, WriteBuf};

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::limits::Limits;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 8;

/// The standard message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    /// Length of the fixed block that follows the header.
    pub block_length: u16,
    /// Message shape within the schema.
    pub template_id: u16,
    /// Schema the template belongs to.
    pub schema_id: u16,
    /// Schema version the sender encoded with.
    pub version: u16,
}

impl MessageHeader {
    /// Creates a header from its four fields.
    #[must_use]
    pub const fn new(block_length: u16, template_id: u16, schema_id: u16, version: u16) -> Self {
        Self {
            block_length,
            template_id,
            schema_id,
            version,
        }
    }

    /// Reads a header at `offset` without validating it.
    pub fn read(buf: &ReadBuf<'_>, offset: usize) -> WireResult<Self> {
        buf.check(offset, HEADER_SIZE)?;
        Ok(Self {
            block_length: buf.get(offset)?,
            template_id: buf.get(offset + 2)?,
            schema_id: buf.get(offset + 4)?,
            version: buf.get(offset + 6)?,
        })
    }

    /// Writes the header at `offset`.
    pub fn write(&self, buf: &mut WriteBuf<'_>, offset: usize) -> Result<usize, EncodeError> {
        buf.check(offset, HEADER_SIZE)?;
        buf.put(offset, self.block_length)?;
        buf.put(offset + 2, self.template_id)?;
        buf.put(offset + 4, self.schema_id)?;
        buf.put(offset + 6, self.version)?;
        Ok(HEADER_SIZE)
    }
}

/// Encodes a header into the start of `out`.
pub fn encode_header(header: &MessageHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    header.write(&mut WriteBuf::new(out), 0)
}

/// Decodes and validates the header at `offset`.
///
/// Validation checks that neither the block length nor the template id is
/// the null sentinel, that the acting block length is within limits, and
/// that the buffer holds the header plus the full fixed block. Bytes past
/// the fixed block are not inspected; the buffer may hold further frames.
pub fn decode_header(buf: &[u8], offset: usize, limits: &Limits) -> WireResult<MessageHeader> {
    let view = ReadBuf::new(buf);
    let header = MessageHeader::read(&view, offset)?;
    if header.block_length.is_null() {
        return Err(DecodeError::NullHeaderField {
            field: "block_length",
        });
    }
    if header.template_id.is_null() {
        return Err(DecodeError::NullHeaderField {
            field: "template_id",
        });
    }

    let block_length = usize::from(header.block_length);
    if block_length > limits.max_block_length {
        tracing::debug!(block_length, limit = limits.max_block_length, "block length too large");
        return Err(DecodeError::LimitsExceeded {
            kind: LimitKind::BlockLength,
            limit: limits.max_block_length,
            actual: block_length,
        });
    }
    limits.check_message_bytes(HEADER_SIZE + block_length)?;
    view.check(offset + HEADER_SIZE, block_length)?;

    tracing::trace!(
        template_id = header.template_id,
        schema_id = header.schema_id,
        version = header.version,
        block_length,
        "decoded message header"
    );
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buffer::BufferError;

    #[test]
    fn header_size_is_correct() {
        // block_length(2) + template_id(2) + schema_id(2) + version(2)
        assert_eq!(HEADER_SIZE, 8);
    }

    #[test]
    fn header_layout_is_little_endian() {
        let header = MessageHeader::new(10, 1, 1, 0);
        let mut buf = [0u8; HEADER_SIZE];
        assert_eq!(encode_header(&header, &mut buf).unwrap(), HEADER_SIZE);
        assert_eq!(buf, [10, 0, 1, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn header_roundtrip_with_block() {
        let header = MessageHeader::new(18, 15, 1, 3);
        let mut buf = [0u8; HEADER_SIZE + 18];
        encode_header(&header, &mut buf).unwrap();
        let decoded = decode_header(&buf, 0, &Limits::for_testing()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn header_at_offset() {
        let header = MessageHeader::new(2, 25, 1, 0);
        let mut buf = [0u8; 4 + HEADER_SIZE + 2];
        header.write(&mut WriteBuf::new(&mut buf), 4).unwrap();
        let decoded = decode_header(&buf, 4, &Limits::for_testing()).unwrap();
        assert_eq!(decoded.template_id, 25);
    }

    #[test]
    fn header_rejects_short_buffer() {
        let buf = [0u8; 5];
        let err = decode_header(&buf, 0, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Buffer(BufferError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn header_rejects_missing_block() {
        let header = MessageHeader::new(10, 1, 1, 0);
        let mut buf = [0u8; HEADER_SIZE + 4];
        encode_header(&header, &mut buf).unwrap();
        let err = decode_header(&buf, 0, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Buffer(BufferError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn header_rejects_block_length_over_limit() {
        let header = MessageHeader::new(300, 1, 1, 0);
        let mut buf = [0u8; HEADER_SIZE + 300];
        encode_header(&header, &mut buf).unwrap();
        let err = decode_header(&buf, 0, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::BlockLength,
                ..
            }
        ));
    }

    #[test]
    fn header_ignores_trailing_buffer_length() {
        let header = MessageHeader::new(18, 15, 1, 0);
        let mut buf = vec![0u8; 2 * 1024 * 1024];
        encode_header(&header, &mut buf).unwrap();
        let decoded = decode_header(&buf, 0, &Limits::default()).unwrap();
        assert_eq!(decoded, header);

        let mut small = vec![0u8; 5000];
        encode_header(&header, &mut small).unwrap();
        assert!(decode_header(&small, 0, &Limits::for_testing()).is_ok());
    }

    #[test]
    fn header_rejects_block_past_message_limit() {
        let header = MessageHeader::new(100, 1, 1, 0);
        let mut buf = [0u8; HEADER_SIZE + 100];
        encode_header(&header, &mut buf).unwrap();
        let limits = Limits {
            max_message_bytes: 64,
            ..Limits::for_testing()
        };
        let err = decode_header(&buf, 0, &limits).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                limit: 64,
                actual: HEADER_SIZE + 100,
            }
        );
    }

    #[test]
    fn header_rejects_null_template() {
        let header = MessageHeader::new(0, u16::MAX, 1, 0);
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&header, &mut buf).unwrap();
        let err = decode_header(&buf, 0, &Limits::for_testing()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NullHeaderField {
                field: "template_id"
            }
        );
    }

    #[test]
    fn encode_into_small_buffer_fails() {
        let header = MessageHeader::new(0, 1, 1, 0);
        let mut buf = [0u8; 4];
        let err = encode_header(&header, &mut buf).unwrap_err();
        assert!(matches!(err, EncodeError::Buffer(_)));
        assert_eq!(buf, [0u8; 4]);
    }
}
