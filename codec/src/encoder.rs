//! Message, group and element encoders.

use buffer::{Primitive, WriteBuf};
use schema::{FieldDef, Presence, ScalarValue};
use wire::{
    GroupDimension, LengthPrefix, MessageHeader, GROUP_HEADER_SIZE, HEADER_SIZE,
    MAX_GROUP_BLOCK_LENGTH, MAX_GROUP_COUNT,
};

use crate::cursor::WriteCursor;
use crate::decoder::MessageDecoder;
use crate::error::{CodecError, CodecResult, ValueReason};

/// Write access to one record: a message body or a group element.
///
/// Fixed fields are written at offsets relative to the block start and may
/// be written in any order. Groups and var-data are appended at the cursor
/// and must be written in schema order: every group first, then every
/// var-data field, each group element complete before the next begins.
pub trait EncodeBlock<'a> {
    /// The cursor shared by the whole message.
    fn cursor(&mut self) -> &mut WriteCursor<'a>;

    /// Absolute offset of the block.
    fn block_offset(&self) -> usize;

    /// Length of the fixed block.
    fn block_length(&self) -> u16;

    /// Writes a required scalar at `offset`.
    ///
    /// Rejects the type's null sentinel and values outside `[min, max]`.
    fn put<T: Primitive>(&mut self, offset: usize, value: T) -> CodecResult<()> {
        if value.is_null() {
            return Err(CodecError::InvalidValue {
                offset,
                reason: ValueReason::NullOnRequired,
            });
        }
        if !value.in_range() {
            return Err(CodecError::InvalidValue {
                offset,
                reason: ValueReason::OutOfRange,
            });
        }
        write_scalar(self, offset, value)
    }

    /// Writes the null sentinel of `T` at `offset`, marking an optional
    /// field absent.
    fn put_null<T: Primitive>(&mut self, offset: usize) -> CodecResult<()> {
        write_scalar(self, offset, T::NULL)
    }

    /// Writes a dynamically typed value for `field`, honouring its presence.
    fn put_scalar(&mut self, field: &FieldDef, value: ScalarValue) -> CodecResult<()> {
        let offset = usize::from(field.offset);
        if value.primitive_type() != field.primitive {
            return Err(CodecError::InvalidValue {
                offset,
                reason: ValueReason::TypeMismatch {
                    expected: field.primitive.name(),
                    found: value.primitive_type().name(),
                },
            });
        }
        if value.is_null() {
            if field.presence == Presence::Required {
                return Err(CodecError::InvalidValue {
                    offset,
                    reason: ValueReason::NullOnRequired,
                });
            }
        } else if !value.in_range() {
            return Err(CodecError::InvalidValue {
                offset,
                reason: ValueReason::OutOfRange,
            });
        }
        check_in_block(offset, field.primitive.size(), self.block_length())?;
        let at = self.block_offset() + offset;
        value.write(self.cursor().buf(), at)?;
        Ok(())
    }

    /// Appends a var-data frame at the cursor.
    ///
    /// Fails before touching the buffer or the limit if the payload is longer
    /// than the prefix allows or does not fit in the output.
    fn put_var_data(&mut self, prefix: LengthPrefix, bytes: &[u8]) -> CodecResult<()> {
        prefix.check_length(bytes.len())?;
        let width = prefix.width();
        let cursor = self.cursor();
        let start = cursor.reserve(width + bytes.len())?;
        prefix.write_length(cursor.buf(), start, bytes.len())?;
        cursor.buf().put_bytes(start + width, bytes)?;
        Ok(())
    }

    /// Appends a UTF-8 var-data frame at the cursor.
    fn put_str(&mut self, prefix: LengthPrefix, value: &str) -> CodecResult<()> {
        self.put_var_data(prefix, value.as_bytes())
    }

    /// Writes a group header at the cursor and returns the element encoder.
    fn group(&mut self, block_length: u16, count: usize) -> CodecResult<GroupEncoder<'_, 'a>> {
        if usize::from(block_length) > MAX_GROUP_BLOCK_LENGTH {
            return Err(CodecError::BlockLengthOutOfRange {
                block_length: usize::from(block_length),
                max: MAX_GROUP_BLOCK_LENGTH,
            });
        }
        let num_in_group = match u16::try_from(count) {
            Ok(n) if count <= MAX_GROUP_COUNT => n,
            _ => {
                return Err(CodecError::GroupCountOutOfRange {
                    count,
                    max: MAX_GROUP_COUNT,
                })
            }
        };

        let cursor = self.cursor();
        let start = cursor.reserve(GROUP_HEADER_SIZE)?;
        GroupDimension::new(block_length, num_in_group).write(cursor.buf(), start)?;
        tracing::trace!(block_length, count, offset = start, "begin group encode");

        Ok(GroupEncoder {
            cursor,
            block_length,
            count,
            index: 0,
        })
    }
}

fn check_in_block(offset: usize, size: usize, block_length: u16) -> CodecResult<()> {
    if offset.saturating_add(size) > usize::from(block_length) {
        return Err(CodecError::FieldOutOfBlock {
            offset,
            size,
            block_length: usize::from(block_length),
        });
    }
    Ok(())
}

fn write_scalar<'a, B, T>(block: &mut B, offset: usize, value: T) -> CodecResult<()>
where
    B: EncodeBlock<'a> + ?Sized,
    T: Primitive,
{
    check_in_block(offset, T::SIZE, block.block_length())?;
    let at = block.block_offset() + offset;
    block.cursor().buf().put(at, value)?;
    Ok(())
}

/// Encoder for a top-level message body.
///
/// `wrap` reserves the fixed block; `encoded_length` is the number of bytes
/// written from the start of the block to the cursor.
#[derive(Debug)]
pub struct MessageEncoder<'a> {
    cursor: WriteCursor<'a>,
    offset: usize,
    block_length: u16,
}

impl<'a> MessageEncoder<'a> {
    /// Wraps `buf` with the fixed block starting at `offset`.
    pub fn wrap(buf: &'a mut [u8], offset: usize, block_length: u16) -> CodecResult<Self> {
        let mut cursor = WriteCursor::new(buf, offset);
        cursor.reserve(usize::from(block_length))?;
        Ok(Self {
            cursor,
            offset,
            block_length,
        })
    }

    /// Writes `header` at `offset` and wraps the block that follows it.
    ///
    /// The header is not counted in [`encoded_length`](Self::encoded_length).
    pub fn wrap_with_header(
        buf: &'a mut [u8],
        offset: usize,
        header: &MessageHeader,
    ) -> CodecResult<Self> {
        header.write(&mut WriteBuf::new(&mut *buf), offset)?;
        Self::wrap(buf, offset + HEADER_SIZE, header.block_length)
    }

    /// Offset of the fixed block.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// First byte not yet written.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Bytes written so far, counted from the block start.
    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        self.cursor.limit() - self.offset
    }

    /// A decoder over what has been written so far, at `version`.
    pub fn as_decoder(&self, version: u16) -> CodecResult<MessageDecoder<'_>> {
        MessageDecoder::wrap(
            self.cursor.read_view().as_slice(),
            self.offset,
            self.block_length,
            version,
        )
    }
}

impl<'a> EncodeBlock<'a> for MessageEncoder<'a> {
    fn cursor(&mut self) -> &mut WriteCursor<'a> {
        &mut self.cursor
    }

    fn block_offset(&self) -> usize {
        self.offset
    }

    fn block_length(&self) -> u16 {
        self.block_length
    }
}

/// Sequential writer for the elements of one group.
#[derive(Debug)]
pub struct GroupEncoder<'c, 'a> {
    cursor: &'c mut WriteCursor<'a>,
    block_length: u16,
    count: usize,
    index: usize,
}

impl<'c, 'a> GroupEncoder<'c, 'a> {
    /// Starts the next element at the cursor and reserves its block.
    pub fn next(&mut self) -> CodecResult<ElementEncoder<'_, 'a>> {
        if self.index >= self.count {
            return Err(CodecError::GroupExhausted { count: self.count });
        }
        let offset = self.cursor.reserve(usize::from(self.block_length))?;
        self.index += 1;
        Ok(ElementEncoder {
            cursor: &mut *self.cursor,
            offset,
            block_length: self.block_length,
        })
    }

    /// Declared element count.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Elements started so far.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Elements still to be written.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.count - self.index
    }
}

/// Encoder for a single group element.
#[derive(Debug)]
pub struct ElementEncoder<'e, 'a> {
    cursor: &'e mut WriteCursor<'a>,
    offset: usize,
    block_length: u16,
}

impl<'e, 'a> EncodeBlock<'a> for ElementEncoder<'e, 'a> {
    fn cursor(&mut self) -> &mut WriteCursor<'a> {
        &mut *self.cursor
    }

    fn block_offset(&self) -> usize {
        self.offset
    }

    fn block_length(&self) -> u16 {
        self.block_length
    }
}
