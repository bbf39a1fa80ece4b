//! Message, group and element decoders.

use buffer::Primitive;
use schema::{FieldDef, ScalarValue};
use wire::{
    GroupDimension, LengthPrefix, MessageHeader, GROUP_HEADER_SIZE, HEADER_SIZE,
    MAX_GROUP_BLOCK_LENGTH, MAX_GROUP_COUNT,
};

use crate::cursor::ReadCursor;
use crate::error::{CodecError, CodecResult, LimitKind};
use crate::limits::CodecLimits;

/// Read access to one record: a message body or a group element.
///
/// Fixed fields are read relative to the block start and gated by the acting
/// block length and version: a field the sender's block does not cover, or
/// one introduced after the sender's version, reads as its null value.
/// Groups and var-data are consumed at the cursor in schema order.
pub trait DecodeBlock<'a> {
    /// The cursor shared by the whole message.
    fn cursor(&mut self) -> &mut ReadCursor<'a>;

    /// Shared view of the cursor.
    fn cursor_ref(&self) -> &ReadCursor<'a>;

    /// Absolute offset of the block.
    fn block_offset(&self) -> usize;

    /// Block length the sender encoded.
    fn acting_block_length(&self) -> u16;

    /// Schema version the sender encoded.
    fn acting_version(&self) -> u16;

    /// Reads the scalar at `offset`, or its null value when the acting block
    /// does not cover it.
    fn get<T: Primitive>(&self, offset: usize) -> CodecResult<T> {
        if offset.saturating_add(T::SIZE) > usize::from(self.acting_block_length()) {
            return Ok(T::NULL);
        }
        Ok(self.cursor_ref().buf().get(self.block_offset() + offset)?)
    }

    /// Like [`get`](Self::get), but also null when the sender's version
    /// predates `since_version`.
    fn get_since<T: Primitive>(&self, offset: usize, since_version: u16) -> CodecResult<T> {
        if self.acting_version() < since_version {
            return Ok(T::NULL);
        }
        self.get(offset)
    }

    /// Reads an optional scalar, mapping absence and the null sentinel to
    /// `None`.
    fn get_optional<T: Primitive>(
        &self,
        offset: usize,
        since_version: u16,
    ) -> CodecResult<Option<T>> {
        let value: T = self.get_since(offset, since_version)?;
        Ok((!value.is_null()).then_some(value))
    }

    /// Reads `field` dynamically, honouring its introduction version.
    fn get_field(&self, field: &FieldDef) -> CodecResult<ScalarValue> {
        let offset = usize::from(field.offset);
        if self.acting_version() < field.since_version
            || field.end() > usize::from(self.acting_block_length())
        {
            return Ok(field.primitive.null_value());
        }
        Ok(field
            .primitive
            .read(self.cursor_ref().buf(), self.block_offset() + offset)?)
    }

    /// Peeks the length of the var-data frame at the cursor.
    ///
    /// Does not move the cursor; calling it repeatedly returns the same value.
    fn var_data_length(&self, prefix: LengthPrefix) -> CodecResult<usize> {
        let cursor = self.cursor_ref();
        let length = prefix.read_length(cursor.buf(), cursor.limit())?;
        if length > prefix.max_length() {
            return Err(CodecError::LengthOverflow {
                length,
                max: prefix.max_length(),
            });
        }
        let limit = cursor.limits().max_var_data_len;
        if length > limit {
            tracing::debug!(length, limit, "rejecting var-data: length over limit");
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::VarDataLength,
                limit,
                actual: length,
            });
        }
        Ok(length)
    }

    /// Consumes the var-data frame at the cursor and borrows its payload.
    fn var_data(&mut self, prefix: LengthPrefix) -> CodecResult<&'a [u8]> {
        let length = self.var_data_length(prefix)?;
        let cursor = self.cursor();
        let start = cursor.consume(prefix.width() + length)?;
        Ok(cursor.buf().bytes(start + prefix.width(), length)?)
    }

    /// Consumes the var-data frame at the cursor as UTF-8 text.
    fn var_str(&mut self, prefix: LengthPrefix) -> CodecResult<&'a str> {
        let payload_start = self.cursor_ref().limit() + prefix.width();
        let bytes = self.var_data(prefix)?;
        std::str::from_utf8(bytes).map_err(|e| CodecError::InvalidUtf8 {
            offset: payload_start + e.valid_up_to(),
        })
    }

    /// Copies up to `dst.len()` payload bytes into `dst` and consumes the
    /// whole frame. Returns the number of bytes copied.
    fn copy_var_data(&mut self, prefix: LengthPrefix, dst: &mut [u8]) -> CodecResult<usize> {
        let bytes = self.var_data(prefix)?;
        let copied = bytes.len().min(dst.len());
        dst[..copied].copy_from_slice(&bytes[..copied]);
        Ok(copied)
    }

    /// Consumes the var-data frame at the cursor without reading it.
    /// Returns the payload length.
    fn skip_var_data(&mut self, prefix: LengthPrefix) -> CodecResult<usize> {
        self.var_data(prefix).map(<[u8]>::len)
    }

    /// Consumes a var-data frame introduced in `since_version`, or returns
    /// `None` without moving the cursor if the sender predates it.
    fn var_data_since(
        &mut self,
        prefix: LengthPrefix,
        since_version: u16,
    ) -> CodecResult<Option<&'a [u8]>> {
        if self.acting_version() < since_version {
            return Ok(None);
        }
        self.var_data(prefix).map(Some)
    }

    /// Reads the group header at the cursor and returns the element decoder.
    fn group(&mut self) -> CodecResult<GroupDecoder<'_, 'a>> {
        let acting_version = self.acting_version();
        let cursor = self.cursor();
        let header_at = cursor.limit();
        let dimension = GroupDimension::read(cursor.buf(), header_at)?;
        let block_length = usize::from(dimension.block_length);
        let count = usize::from(dimension.num_in_group);

        if block_length > MAX_GROUP_BLOCK_LENGTH {
            return Err(CodecError::BlockLengthOutOfRange {
                block_length,
                max: MAX_GROUP_BLOCK_LENGTH,
            });
        }
        if count > MAX_GROUP_COUNT {
            return Err(CodecError::GroupCountOutOfRange {
                count,
                max: MAX_GROUP_COUNT,
            });
        }
        let limit = cursor.limits().max_group_count;
        if count > limit {
            tracing::debug!(count, limit, "rejecting group: count over limit");
            return Err(CodecError::LimitsExceeded {
                kind: LimitKind::GroupCount,
                limit,
                actual: count,
            });
        }
        // The fixed portions alone must fit before any element is visited.
        cursor
            .buf()
            .check(header_at + GROUP_HEADER_SIZE, block_length.saturating_mul(count))?;
        cursor.count_elements(count)?;
        cursor.consume(GROUP_HEADER_SIZE)?;
        tracing::trace!(block_length, count, offset = header_at, "begin group decode");

        Ok(GroupDecoder {
            cursor,
            block_length: dimension.block_length,
            count,
            index: 0,
            acting_version,
        })
    }

    /// Reads a group introduced in `since_version`, or returns `None` without
    /// moving the cursor if the sender predates it.
    fn group_since(&mut self, since_version: u16) -> CodecResult<Option<GroupDecoder<'_, 'a>>> {
        if self.acting_version() < since_version {
            return Ok(None);
        }
        self.group().map(Some)
    }
}

/// Decoder for a top-level message body.
///
/// Cloning a decoder snapshots its cursor; the clone advances independently.
#[derive(Debug, Clone)]
pub struct MessageDecoder<'a> {
    cursor: ReadCursor<'a>,
    offset: usize,
    acting_block_length: u16,
    acting_version: u16,
}

impl<'a> MessageDecoder<'a> {
    /// Wraps `buf` with the block at `offset`.
    ///
    /// Applies [`CodecLimits::format_max`], so every well-formed message
    /// decodes. Use [`MessageDecoder::wrap_with_limits`] for untrusted input.
    pub fn wrap(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
    ) -> CodecResult<Self> {
        Self::wrap_with_limits(
            buf,
            offset,
            acting_block_length,
            acting_version,
            &CodecLimits::format_max(),
        )
    }

    /// Wraps `buf` with the block at `offset`.
    ///
    /// `acting_block_length` and `acting_version` come from the sender, not
    /// from the local schema. The whole acting block must be present.
    pub fn wrap_with_limits(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
        limits: &CodecLimits,
    ) -> CodecResult<Self> {
        let mut cursor = ReadCursor::new(buf, offset, *limits);
        cursor.consume(usize::from(acting_block_length))?;
        Ok(Self {
            cursor,
            offset,
            acting_block_length,
            acting_version,
        })
    }

    /// Decodes the header at `offset` and wraps the block that follows it.
    pub fn wrap_with_header(
        buf: &'a [u8],
        offset: usize,
        wire_limits: &wire::Limits,
        limits: &CodecLimits,
    ) -> CodecResult<(MessageHeader, Self)> {
        let header = wire::decode_header(buf, offset, wire_limits)?;
        let decoder = Self::wrap_with_limits(
            buf,
            offset + HEADER_SIZE,
            header.block_length,
            header.version,
            limits,
        )?;
        Ok((header, decoder))
    }

    /// Moves the cursor back to the end of the fixed block.
    pub fn rewind(&mut self) {
        self.cursor
            .reset(self.offset + usize::from(self.acting_block_length));
    }

    /// The wrapped buffer.
    #[must_use]
    pub const fn buffer(&self) -> &'a [u8] {
        self.cursor.buf().as_slice()
    }

    /// Offset of the fixed block.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// First byte not yet consumed.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Bytes consumed so far, counted from the block start.
    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        self.cursor.limit() - self.offset
    }

    /// Limits applied to this pass.
    #[must_use]
    pub const fn limits(&self) -> &CodecLimits {
        self.cursor.limits()
    }
}

impl<'a> DecodeBlock<'a> for MessageDecoder<'a> {
    fn cursor(&mut self) -> &mut ReadCursor<'a> {
        &mut self.cursor
    }

    fn cursor_ref(&self) -> &ReadCursor<'a> {
        &self.cursor
    }

    fn block_offset(&self) -> usize {
        self.offset
    }

    fn acting_block_length(&self) -> u16 {
        self.acting_block_length
    }

    fn acting_version(&self) -> u16 {
        self.acting_version
    }
}

/// Sequential reader for the elements of one group.
///
/// Element `k` is reachable only after elements `0..k` have been fully
/// consumed, including their own groups and var-data.
#[derive(Debug)]
pub struct GroupDecoder<'c, 'a> {
    cursor: &'c mut ReadCursor<'a>,
    block_length: u16,
    count: usize,
    index: usize,
    acting_version: u16,
}

impl<'c, 'a> GroupDecoder<'c, 'a> {
    /// Starts the next element at the cursor and consumes its block.
    pub fn next(&mut self) -> CodecResult<ElementDecoder<'_, 'a>> {
        if self.index >= self.count {
            return Err(CodecError::GroupExhausted { count: self.count });
        }
        let offset = self.cursor.consume(usize::from(self.block_length))?;
        self.index += 1;
        Ok(ElementDecoder {
            cursor: &mut *self.cursor,
            offset,
            block_length: self.block_length,
            acting_version: self.acting_version,
        })
    }

    /// Returns `true` while elements remain.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.index < self.count
    }

    /// Element count from the group header.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Element block length from the group header.
    #[must_use]
    pub const fn acting_block_length(&self) -> u16 {
        self.block_length
    }

    /// Elements started so far.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Decoder for a single group element.
#[derive(Debug)]
pub struct ElementDecoder<'e, 'a> {
    cursor: &'e mut ReadCursor<'a>,
    offset: usize,
    block_length: u16,
    acting_version: u16,
}

impl<'e, 'a> DecodeBlock<'a> for ElementDecoder<'e, 'a> {
    fn cursor(&mut self) -> &mut ReadCursor<'a> {
        &mut *self.cursor
    }

    fn cursor_ref(&self) -> &ReadCursor<'a> {
        self.cursor
    }

    fn block_offset(&self) -> usize {
        self.offset
    }

    fn acting_block_length(&self) -> u16 {
        self.block_length
    }

    fn acting_version(&self) -> u16 {
        self.acting_version
    }
}
