//! `Message` (template 1): a replicated payload split into segments.
//!
//! ```text
//! [replicaVersion u64][destId u16]
//! [segments: block_length=0 count][ [len u32][segmentBytes] ]*
//! ```

use std::fmt;

use codec::{
    CodecLimits, CodecResult, DecodeBlock, ElementDecoder, ElementEncoder, EncodeBlock,
    GroupDecoder, GroupEncoder, MessageDisplay,
};
use schema::{BlockDef, FieldDef, GroupDef, MessageDescriptor, PrimitiveType, VarDataDef};
use wire::{LengthPrefix, MessageHeader, GROUP_HEADER_SIZE};

use crate::meta::{field_meta, var_data_meta};
use crate::{SCHEMA_ID, SCHEMA_VERSION};

const REPLICA_VERSION: FieldDef = FieldDef::new("replicaVersion", 2, 0, PrimitiveType::UInt64);
const DEST_ID: FieldDef = FieldDef::new("destId", 3, 8, PrimitiveType::UInt16);
const SEGMENT_BYTES: VarDataDef = VarDataDef::new("segmentBytes", 5, LengthPrefix::U32);
const SEGMENT_VAR_DATA: &[VarDataDef] = &[SEGMENT_BYTES];
const SEGMENTS: GroupDef = GroupDef::new(
    "segments",
    4,
    BlockDef::new(0).with_var_data(SEGMENT_VAR_DATA),
);

const FIELDS: &[FieldDef] = &[REPLICA_VERSION, DEST_ID];
const GROUPS: &[GroupDef] = &[SEGMENTS];

pub const TEMPLATE_ID: u16 = 1;

/// Layout of `Message`.
pub const DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    name: "Message",
    template_id: TEMPLATE_ID,
    schema_id: SCHEMA_ID,
    schema_version: SCHEMA_VERSION,
    body: BlockDef::new(10).with_fields(FIELDS).with_groups(GROUPS),
};

/// Writes a `Message`: fixed fields first, then exactly one
/// [`segments_count`](Self::segments_count) call.
#[derive(Debug)]
pub struct MessageEncoder<'a> {
    inner: codec::MessageEncoder<'a>,
}

impl<'a> MessageEncoder<'a> {
    pub const BLOCK_LENGTH: u16 = DESCRIPTOR.block_length();
    pub const TEMPLATE_ID: u16 = TEMPLATE_ID;
    pub const SCHEMA_ID: u16 = SCHEMA_ID;
    pub const SCHEMA_VERSION: u16 = SCHEMA_VERSION;

    field_meta!(REPLICA_VERSION => u64 {
        id: replica_version_id,
        since_version: replica_version_since_version,
        offset: replica_version_offset,
        length: replica_version_length,
        null: replica_version_null_value,
        min: replica_version_min_value,
        max: replica_version_max_value,
    });

    field_meta!(DEST_ID => u16 {
        id: dest_id_id,
        since_version: dest_id_since_version,
        offset: dest_id_offset,
        length: dest_id_length,
        null: dest_id_null_value,
        min: dest_id_min_value,
        max: dest_id_max_value,
    });

    #[must_use]
    pub const fn segments_id() -> u16 {
        SEGMENTS.id
    }

    #[must_use]
    pub const fn segments_since_version() -> u16 {
        SEGMENTS.since_version
    }

    pub fn wrap(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap(buf, offset, Self::BLOCK_LENGTH).map(|inner| Self { inner })
    }

    pub fn wrap_with_header(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap_with_header(buf, offset, &DESCRIPTOR.header())
            .map(|inner| Self { inner })
    }

    pub fn replica_version(&mut self, value: u64) -> CodecResult<&mut Self> {
        self.inner.put(Self::replica_version_offset(), value)?;
        Ok(self)
    }

    pub fn dest_id(&mut self, value: u16) -> CodecResult<&mut Self> {
        self.inner.put(Self::dest_id_offset(), value)?;
        Ok(self)
    }

    /// Starts the `segments` group with `count` elements.
    pub fn segments_count(&mut self, count: usize) -> CodecResult<SegmentsEncoder<'_, 'a>> {
        self.inner
            .group(SEGMENTS.body.block_length, count)
            .map(|group| SegmentsEncoder { group })
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.inner.limit()
    }

    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        self.inner.encoded_length()
    }
}

impl fmt::Display for MessageEncoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_decoder(SCHEMA_VERSION) {
            Ok(decoder) => fmt::Display::fmt(&decoder.display(&DESCRIPTOR), f),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

/// Writes the elements of `segments`, one at a time.
#[derive(Debug)]
pub struct SegmentsEncoder<'g, 'a> {
    group: GroupEncoder<'g, 'a>,
}

impl<'g, 'a> SegmentsEncoder<'g, 'a> {
    pub const HEADER_SIZE: usize = GROUP_HEADER_SIZE;
    pub const BLOCK_LENGTH: u16 = SEGMENTS.body.block_length;

    var_data_meta!(SEGMENT_BYTES => {
        id: segment_bytes_id,
        since_version: segment_bytes_since_version,
        header_length: segment_bytes_header_length,
        character_encoding: segment_bytes_character_encoding,
    });

    /// Starts the next element. Fails once `count` elements were started.
    pub fn next(&mut self) -> CodecResult<SegmentEncoder<'_, 'a>> {
        self.group.next().map(|element| SegmentEncoder { element })
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.group.count()
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.group.remaining()
    }
}

#[derive(Debug)]
pub struct SegmentEncoder<'e, 'a> {
    element: ElementEncoder<'e, 'a>,
}

impl SegmentEncoder<'_, '_> {
    pub fn segment_bytes(&mut self, value: &str) -> CodecResult<&mut Self> {
        self.element.put_str(SEGMENT_BYTES.prefix, value)?;
        Ok(self)
    }

    pub fn put_segment_bytes(&mut self, bytes: &[u8]) -> CodecResult<&mut Self> {
        self.element.put_var_data(SEGMENT_BYTES.prefix, bytes)?;
        Ok(self)
    }
}

/// Reads a `Message` in place.
#[derive(Debug, Clone)]
pub struct MessageDecoder<'a> {
    inner: codec::MessageDecoder<'a>,
}

impl<'a> MessageDecoder<'a> {
    pub const BLOCK_LENGTH: u16 = DESCRIPTOR.block_length();
    pub const TEMPLATE_ID: u16 = TEMPLATE_ID;
    pub const SCHEMA_ID: u16 = SCHEMA_ID;
    pub const SCHEMA_VERSION: u16 = SCHEMA_VERSION;

    pub fn wrap(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
    ) -> CodecResult<Self> {
        codec::MessageDecoder::wrap(buf, offset, acting_block_length, acting_version)
            .map(Self::from_decoder)
    }

    pub fn wrap_with_limits(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
        limits: &CodecLimits,
    ) -> CodecResult<Self> {
        codec::MessageDecoder::wrap_with_limits(
            buf,
            offset,
            acting_block_length,
            acting_version,
            limits,
        )
        .map(Self::from_decoder)
    }

    pub(crate) const fn from_decoder(inner: codec::MessageDecoder<'a>) -> Self {
        Self { inner }
    }

    pub fn replica_version(&self) -> CodecResult<u64> {
        self.inner
            .get_since(usize::from(REPLICA_VERSION.offset), REPLICA_VERSION.since_version)
    }

    pub fn dest_id(&self) -> CodecResult<u16> {
        self.inner
            .get_since(usize::from(DEST_ID.offset), DEST_ID.since_version)
    }

    /// Reads the `segments` group header. A sender predating the group
    /// yields an empty group.
    pub fn segments(&mut self) -> CodecResult<SegmentsDecoder<'_, 'a>> {
        let group = self.inner.group_since(SEGMENTS.since_version)?;
        Ok(SegmentsDecoder { group })
    }

    #[must_use]
    pub fn acting_block_length(&self) -> u16 {
        self.inner.acting_block_length()
    }

    #[must_use]
    pub fn acting_version(&self) -> u16 {
        self.inner.acting_version()
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.inner.limit()
    }

    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        self.inner.encoded_length()
    }

    #[must_use]
    pub fn display(&self) -> MessageDisplay<'static, 'a> {
        self.inner.display(&DESCRIPTOR)
    }
}

impl fmt::Display for MessageDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(), f)
    }
}

/// Reads the elements of `segments` in order.
#[derive(Debug)]
pub struct SegmentsDecoder<'g, 'a> {
    group: Option<GroupDecoder<'g, 'a>>,
}

impl<'g, 'a> SegmentsDecoder<'g, 'a> {
    pub fn next(&mut self) -> CodecResult<SegmentDecoder<'_, 'a>> {
        match self.group.as_mut() {
            Some(group) => group.next().map(|element| SegmentDecoder { element }),
            None => Err(codec::CodecError::GroupExhausted { count: 0 }),
        }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.group.as_ref().is_some_and(GroupDecoder::has_next)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.group.as_ref().map_or(0, GroupDecoder::count)
    }

    #[must_use]
    pub fn acting_block_length(&self) -> u16 {
        self.group
            .as_ref()
            .map_or(SEGMENTS.body.block_length, GroupDecoder::acting_block_length)
    }
}

#[derive(Debug)]
pub struct SegmentDecoder<'e, 'a> {
    element: ElementDecoder<'e, 'a>,
}

impl<'a> SegmentDecoder<'_, 'a> {
    pub fn segment_bytes_length(&self) -> CodecResult<usize> {
        self.element.var_data_length(SEGMENT_BYTES.prefix)
    }

    pub fn segment_bytes(&mut self) -> CodecResult<&'a str> {
        self.element.var_str(SEGMENT_BYTES.prefix)
    }

    pub fn segment_bytes_raw(&mut self) -> CodecResult<&'a [u8]> {
        self.element.var_data(SEGMENT_BYTES.prefix)
    }

    pub fn get_segment_bytes(&mut self, dst: &mut [u8]) -> CodecResult<usize> {
        self.element.copy_var_data(SEGMENT_BYTES.prefix, dst)
    }

    pub fn skip_segment_bytes(&mut self) -> CodecResult<usize> {
        self.element.skip_var_data(SEGMENT_BYTES.prefix)
    }
}

/// Owned `Message` value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub replica_version: u64,
    pub dest_id: u16,
    pub segments: Vec<String>,
}

impl Message {
    pub fn encode(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = MessageEncoder::wrap(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(encoder.encoded_length())
    }

    pub fn encode_with_header(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = MessageEncoder::wrap_with_header(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(wire::HEADER_SIZE + encoder.encoded_length())
    }

    fn write(&self, encoder: &mut MessageEncoder<'_>) -> CodecResult<()> {
        encoder
            .replica_version(self.replica_version)?
            .dest_id(self.dest_id)?;
        let mut segments = encoder.segments_count(self.segments.len())?;
        for segment in &self.segments {
            segments.next()?.segment_bytes(segment)?;
        }
        Ok(())
    }

    pub fn decode(buf: &[u8], offset: usize, header: &MessageHeader) -> CodecResult<Self> {
        let mut decoder = MessageDecoder::wrap(buf, offset, header.block_length, header.version)?;
        Self::read(&mut decoder)
    }

    pub(crate) fn read(decoder: &mut MessageDecoder<'_>) -> CodecResult<Self> {
        let replica_version = decoder.replica_version()?;
        let dest_id = decoder.dest_id()?;
        let mut group = decoder.segments()?;
        let mut segments = Vec::with_capacity(group.count());
        while group.has_next() {
            segments.push(group.next()?.segment_bytes()?.to_owned());
        }
        Ok(Self {
            replica_version,
            dest_id,
            segments,
        })
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        let width = SegmentsEncoder::segment_bytes_header_length();
        usize::from(DESCRIPTOR.block_length())
            + GROUP_HEADER_SIZE
            + self
                .segments
                .iter()
                .map(|s| width + s.len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::CodecError;

    #[test]
    fn layout_constants() {
        assert_eq!(MessageEncoder::BLOCK_LENGTH, 10);
        assert_eq!(MessageEncoder::TEMPLATE_ID, 1);
        assert_eq!(MessageEncoder::replica_version_id(), 2);
        assert_eq!(MessageEncoder::dest_id_offset(), 8);
        assert_eq!(MessageEncoder::dest_id_length(), 2);
        assert_eq!(MessageEncoder::segments_id(), 4);
        assert_eq!(SegmentsEncoder::segment_bytes_id(), 5);
        assert_eq!(SegmentsEncoder::BLOCK_LENGTH, 0);
        assert!(DESCRIPTOR.validate().is_ok());
    }

    #[test]
    fn concrete_scenario() {
        let message = Message {
            replica_version: 42,
            dest_id: 7,
            segments: vec!["a".to_owned(), "bb".to_owned()],
        };
        let mut buf = [0u8; 64];
        let len = message.encode(&mut buf, 0).unwrap();
        assert_eq!(len, 10 + 4 + (4 + 1) + (4 + 2));
        assert_eq!(len, message.encoded_length());

        let mut decoder = MessageDecoder::wrap(&buf[..len], 0, 10, 0).unwrap();
        assert_eq!(decoder.replica_version().unwrap(), 42);
        assert_eq!(decoder.dest_id().unwrap(), 7);
        {
            let mut segments = decoder.segments().unwrap();
            assert_eq!(segments.count(), 2);
            assert_eq!(segments.next().unwrap().segment_bytes().unwrap(), "a");
            let mut second = segments.next().unwrap();
            assert_eq!(second.segment_bytes_length().unwrap(), 2);
            assert_eq!(second.segment_bytes().unwrap(), "bb");
            assert!(!segments.has_next());
        }
        assert_eq!(decoder.encoded_length(), len);
    }

    #[test]
    fn empty_segments_still_write_header() {
        let message = Message {
            replica_version: 1,
            dest_id: 1,
            segments: Vec::new(),
        };
        let mut buf = [0u8; 32];
        let len = message.encode(&mut buf, 0).unwrap();
        assert_eq!(len, 10 + GROUP_HEADER_SIZE);
        assert_eq!(&buf[10..14], &[0, 0, 0, 0]);
        let decoded = Message::decode(&buf[..len], 0, &DESCRIPTOR.header()).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn group_next_past_count_fails() {
        let mut buf = [0u8; 32];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0).unwrap();
        let mut segments = encoder.segments_count(1).unwrap();
        segments.next().unwrap().segment_bytes("x").unwrap();
        assert!(matches!(
            segments.next(),
            Err(CodecError::GroupExhausted { count: 1 })
        ));
    }

    #[test]
    fn renders_group_elements() {
        let message = Message {
            replica_version: 5,
            dest_id: 3,
            segments: vec!["x".to_owned(), "yz".to_owned()],
        };
        let mut buf = [0u8; 64];
        let len = message.encode(&mut buf, 0).unwrap();
        let decoder = MessageDecoder::wrap(&buf[..len], 0, 10, 0).unwrap();
        assert_eq!(
            decoder.to_string(),
            "[Message](sbeTemplateId=1|sbeSchemaId=1|sbeSchemaVersion=0|sbeBlockLength=10):\
             replicaVersion=5|destId=3|segments=[(segmentBytes=x),(segmentBytes=yz)]"
        );
    }

    #[test]
    fn encoder_renders_what_was_written() {
        let mut buf = [0u8; 64];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0).unwrap();
        encoder.replica_version(5).unwrap().dest_id(3).unwrap();
        {
            let mut segments = encoder.segments_count(2).unwrap();
            segments.next().unwrap().segment_bytes("x").unwrap();
            segments.next().unwrap().segment_bytes("yz").unwrap();
        }
        assert_eq!(
            encoder.to_string(),
            "[Message](sbeTemplateId=1|sbeSchemaId=1|sbeSchemaVersion=0|sbeBlockLength=10):\
             replicaVersion=5|destId=3|segments=[(segmentBytes=x),(segmentBytes=yz)]"
        );
    }
}
