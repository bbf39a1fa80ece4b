//! `Barrier` (template 15): a replication barrier carrying an epoch and an
//! opaque payload.

use std::fmt;

use codec::{CodecLimits, CodecResult, DecodeBlock, EncodeBlock, MessageDisplay};
use schema::{BlockDef, FieldDef, MessageDescriptor, PrimitiveType, VarDataDef};
use wire::{LengthPrefix, MessageHeader};

use crate::meta::{field_meta, var_data_meta};
use crate::{SCHEMA_ID, SCHEMA_VERSION};

const REPLICA_VERSION: FieldDef = FieldDef::new("replicaVersion", 16, 0, PrimitiveType::UInt64);
const EPOCH: FieldDef = FieldDef::new("epoch", 17, 8, PrimitiveType::UInt64);
const DEST_ID: FieldDef = FieldDef::new("destId", 18, 16, PrimitiveType::UInt16);
const PAYLOAD_BYTES: VarDataDef = VarDataDef::new("payloadBytes", 19, LengthPrefix::U32);

const FIELDS: &[FieldDef] = &[REPLICA_VERSION, EPOCH, DEST_ID];
const VAR_DATA: &[VarDataDef] = &[PAYLOAD_BYTES];

pub const TEMPLATE_ID: u16 = 15;

/// Layout of `Barrier`.
pub const DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    name: "Barrier",
    template_id: TEMPLATE_ID,
    schema_id: SCHEMA_ID,
    schema_version: SCHEMA_VERSION,
    body: BlockDef::new(18).with_fields(FIELDS).with_var_data(VAR_DATA),
};

/// Writes a `Barrier` into a caller-owned buffer.
///
/// Fixed fields may be set in any order; `payload_bytes` must be the last
/// call.
#[derive(Debug)]
pub struct BarrierEncoder<'a> {
    inner: codec::MessageEncoder<'a>,
}

impl<'a> BarrierEncoder<'a> {
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

    field_meta!(EPOCH => u64 {
        id: epoch_id,
        since_version: epoch_since_version,
        offset: epoch_offset,
        length: epoch_length,
        null: epoch_null_value,
        min: epoch_min_value,
        max: epoch_max_value,
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

    var_data_meta!(PAYLOAD_BYTES => {
        id: payload_bytes_id,
        since_version: payload_bytes_since_version,
        header_length: payload_bytes_header_length,
        character_encoding: payload_bytes_character_encoding,
    });

    /// Wraps `buf` with the block at `offset`.
    pub fn wrap(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap(buf, offset, Self::BLOCK_LENGTH).map(|inner| Self { inner })
    }

    /// Writes the message header at `offset` and wraps the block after it.
    pub fn wrap_with_header(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap_with_header(buf, offset, &DESCRIPTOR.header())
            .map(|inner| Self { inner })
    }

    pub fn replica_version(&mut self, value: u64) -> CodecResult<&mut Self> {
        self.inner.put(Self::replica_version_offset(), value)?;
        Ok(self)
    }

    pub fn epoch(&mut self, value: u64) -> CodecResult<&mut Self> {
        self.inner.put(Self::epoch_offset(), value)?;
        Ok(self)
    }

    pub fn dest_id(&mut self, value: u16) -> CodecResult<&mut Self> {
        self.inner.put(Self::dest_id_offset(), value)?;
        Ok(self)
    }

    /// Appends the payload as UTF-8 text.
    pub fn payload_bytes(&mut self, value: &str) -> CodecResult<&mut Self> {
        self.inner.put_str(PAYLOAD_BYTES.prefix, value)?;
        Ok(self)
    }

    /// Appends the payload from raw bytes.
    pub fn put_payload_bytes(&mut self, bytes: &[u8]) -> CodecResult<&mut Self> {
        self.inner.put_var_data(PAYLOAD_BYTES.prefix, bytes)?;
        Ok(self)
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.inner.limit()
    }

    /// Bytes written from the start of the block.
    #[must_use]
    pub const fn encoded_length(&self) -> usize {
        self.inner.encoded_length()
    }
}

impl fmt::Display for BarrierEncoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_decoder(SCHEMA_VERSION) {
            Ok(decoder) => fmt::Display::fmt(&decoder.display(&DESCRIPTOR), f),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

/// Reads a `Barrier` in place.
#[derive(Debug, Clone)]
pub struct BarrierDecoder<'a> {
    inner: codec::MessageDecoder<'a>,
}

impl<'a> BarrierDecoder<'a> {
    pub const BLOCK_LENGTH: u16 = DESCRIPTOR.block_length();
    pub const TEMPLATE_ID: u16 = TEMPLATE_ID;
    pub const SCHEMA_ID: u16 = SCHEMA_ID;
    pub const SCHEMA_VERSION: u16 = SCHEMA_VERSION;

    /// Wraps `buf` with the block at `offset` as sent by a peer with the
    /// given block length and version.
    pub fn wrap(
        buf: &'a [u8],
        offset: usize,
        acting_block_length: u16,
        acting_version: u16,
    ) -> CodecResult<Self> {
        codec::MessageDecoder::wrap(buf, offset, acting_block_length, acting_version)
            .map(Self::from_decoder)
    }

    /// Like [`wrap`](Self::wrap) with explicit decode limits.
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

    pub fn epoch(&self) -> CodecResult<u64> {
        self.inner
            .get_since(usize::from(EPOCH.offset), EPOCH.since_version)
    }

    pub fn dest_id(&self) -> CodecResult<u16> {
        self.inner
            .get_since(usize::from(DEST_ID.offset), DEST_ID.since_version)
    }

    /// Peeks the payload length without consuming it.
    pub fn payload_bytes_length(&self) -> CodecResult<usize> {
        self.inner.var_data_length(PAYLOAD_BYTES.prefix)
    }

    /// Consumes the payload as UTF-8 text.
    pub fn payload_bytes(&mut self) -> CodecResult<&'a str> {
        self.inner.var_str(PAYLOAD_BYTES.prefix)
    }

    /// Consumes the payload, borrowing its bytes.
    pub fn payload_bytes_raw(&mut self) -> CodecResult<&'a [u8]> {
        self.inner.var_data(PAYLOAD_BYTES.prefix)
    }

    /// Copies up to `dst.len()` payload bytes and consumes the payload.
    pub fn get_payload_bytes(&mut self, dst: &mut [u8]) -> CodecResult<usize> {
        self.inner.copy_var_data(PAYLOAD_BYTES.prefix, dst)
    }

    pub fn skip_payload_bytes(&mut self) -> CodecResult<usize> {
        self.inner.skip_var_data(PAYLOAD_BYTES.prefix)
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

    /// Renders the whole message without moving this decoder.
    #[must_use]
    pub fn display(&self) -> MessageDisplay<'static, 'a> {
        self.inner.display(&DESCRIPTOR)
    }
}

impl fmt::Display for BarrierDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(), f)
    }
}

/// Owned `Barrier` value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Barrier {
    pub replica_version: u64,
    pub epoch: u64,
    pub dest_id: u16,
    pub payload: String,
}

impl Barrier {
    /// Encodes body only and returns the bytes written.
    pub fn encode(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = BarrierEncoder::wrap(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(encoder.encoded_length())
    }

    /// Encodes header and body and returns the bytes written.
    pub fn encode_with_header(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = BarrierEncoder::wrap_with_header(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(wire::HEADER_SIZE + encoder.encoded_length())
    }

    fn write(&self, encoder: &mut BarrierEncoder<'_>) -> CodecResult<()> {
        encoder
            .replica_version(self.replica_version)?
            .epoch(self.epoch)?
            .dest_id(self.dest_id)?
            .payload_bytes(&self.payload)?;
        Ok(())
    }

    /// Decodes a body written with `header`'s block length and version.
    pub fn decode(buf: &[u8], offset: usize, header: &MessageHeader) -> CodecResult<Self> {
        let mut decoder = BarrierDecoder::wrap(buf, offset, header.block_length, header.version)?;
        Self::read(&mut decoder)
    }

    pub(crate) fn read(decoder: &mut BarrierDecoder<'_>) -> CodecResult<Self> {
        Ok(Self {
            replica_version: decoder.replica_version()?,
            epoch: decoder.epoch()?,
            dest_id: decoder.dest_id()?,
            payload: decoder.payload_bytes()?.to_owned(),
        })
    }

    /// Exact encoded body length.
    #[must_use]
    pub fn encoded_length(&self) -> usize {
        usize::from(DESCRIPTOR.block_length())
            + BarrierEncoder::payload_bytes_header_length()
            + self.payload.len()
    }
}
