//! `DynamicMap` (template 25): one key/value entry tagged with the types of
//! its key and value.

use std::fmt;

use codec::{CodecLimits, CodecResult, DecodeBlock, EncodeBlock, MessageDisplay};
use schema::{BlockDef, FieldDef, MessageDescriptor, PrimitiveType, VarDataDef};
use wire::{LengthPrefix, MessageHeader};

use crate::meta::{field_meta, var_data_meta};
use crate::{SCHEMA_ID, SCHEMA_VERSION};

const KEY_TYPE: FieldDef = FieldDef::new("keyType", 26, 0, PrimitiveType::Int8);
const VALUE_TYPE: FieldDef = FieldDef::new("valueType", 27, 1, PrimitiveType::Int8);
const KEY: VarDataDef = VarDataDef::new("key", 28, LengthPrefix::U16);
const VALUE: VarDataDef = VarDataDef::new("value", 29, LengthPrefix::U16);

const FIELDS: &[FieldDef] = &[KEY_TYPE, VALUE_TYPE];
const VAR_DATA: &[VarDataDef] = &[KEY, VALUE];

pub const TEMPLATE_ID: u16 = 25;

/// Layout of `DynamicMap`.
pub const DESCRIPTOR: MessageDescriptor = MessageDescriptor {
    name: "DynamicMap",
    template_id: TEMPLATE_ID,
    schema_id: SCHEMA_ID,
    schema_version: SCHEMA_VERSION,
    body: BlockDef::new(2).with_fields(FIELDS).with_var_data(VAR_DATA),
};

#[derive(Debug)]
pub struct DynamicMapEncoder<'a> {
    inner: codec::MessageEncoder<'a>,
}

impl<'a> DynamicMapEncoder<'a> {
    pub const BLOCK_LENGTH: u16 = DESCRIPTOR.block_length();
    pub const TEMPLATE_ID: u16 = TEMPLATE_ID;
    pub const SCHEMA_ID: u16 = SCHEMA_ID;
    pub const SCHEMA_VERSION: u16 = SCHEMA_VERSION;

    field_meta!(KEY_TYPE => i8 {
        id: key_type_id,
        since_version: key_type_since_version,
        offset: key_type_offset,
        length: key_type_length,
        null: key_type_null_value,
        min: key_type_min_value,
        max: key_type_max_value,
    });

    field_meta!(VALUE_TYPE => i8 {
        id: value_type_id,
        since_version: value_type_since_version,
        offset: value_type_offset,
        length: value_type_length,
        null: value_type_null_value,
        min: value_type_min_value,
        max: value_type_max_value,
    });

    var_data_meta!(KEY => {
        id: key_id,
        since_version: key_since_version,
        header_length: key_header_length,
        character_encoding: key_character_encoding,
    });

    var_data_meta!(VALUE => {
        id: value_id,
        since_version: value_since_version,
        header_length: value_header_length,
        character_encoding: value_character_encoding,
    });

    pub fn wrap(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap(buf, offset, Self::BLOCK_LENGTH).map(|inner| Self { inner })
    }

    pub fn wrap_with_header(buf: &'a mut [u8], offset: usize) -> CodecResult<Self> {
        codec::MessageEncoder::wrap_with_header(buf, offset, &DESCRIPTOR.header())
            .map(|inner| Self { inner })
    }

    pub fn key_type(&mut self, value: i8) -> CodecResult<&mut Self> {
        self.inner.put(Self::key_type_offset(), value)?;
        Ok(self)
    }

    pub fn value_type(&mut self, value: i8) -> CodecResult<&mut Self> {
        self.inner.put(Self::value_type_offset(), value)?;
        Ok(self)
    }

    /// Appends the key. Must precede [`value`](Self::value).
    pub fn key(&mut self, value: &str) -> CodecResult<&mut Self> {
        self.inner.put_str(KEY.prefix, value)?;
        Ok(self)
    }

    pub fn put_key(&mut self, bytes: &[u8]) -> CodecResult<&mut Self> {
        self.inner.put_var_data(KEY.prefix, bytes)?;
        Ok(self)
    }

    pub fn value(&mut self, value: &str) -> CodecResult<&mut Self> {
        self.inner.put_str(VALUE.prefix, value)?;
        Ok(self)
    }

    pub fn put_value(&mut self, bytes: &[u8]) -> CodecResult<&mut Self> {
        self.inner.put_var_data(VALUE.prefix, bytes)?;
        Ok(self)
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

impl fmt::Display for DynamicMapEncoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_decoder(SCHEMA_VERSION) {
            Ok(decoder) => fmt::Display::fmt(&decoder.display(&DESCRIPTOR), f),
            Err(err) => write!(f, "<{err}>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DynamicMapDecoder<'a> {
    inner: codec::MessageDecoder<'a>,
}

impl<'a> DynamicMapDecoder<'a> {
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

    pub fn key_type(&self) -> CodecResult<i8> {
        self.inner
            .get_since(usize::from(KEY_TYPE.offset), KEY_TYPE.since_version)
    }

    pub fn value_type(&self) -> CodecResult<i8> {
        self.inner
            .get_since(usize::from(VALUE_TYPE.offset), VALUE_TYPE.since_version)
    }

    pub fn key_length(&self) -> CodecResult<usize> {
        self.inner.var_data_length(KEY.prefix)
    }

    pub fn key(&mut self) -> CodecResult<&'a str> {
        self.inner.var_str(KEY.prefix)
    }

    pub fn key_raw(&mut self) -> CodecResult<&'a [u8]> {
        self.inner.var_data(KEY.prefix)
    }

    pub fn get_key(&mut self, dst: &mut [u8]) -> CodecResult<usize> {
        self.inner.copy_var_data(KEY.prefix, dst)
    }

    pub fn skip_key(&mut self) -> CodecResult<usize> {
        self.inner.skip_var_data(KEY.prefix)
    }

    /// Peeks the value length. Only meaningful once the key is consumed.
    pub fn value_length(&self) -> CodecResult<usize> {
        self.inner.var_data_length(VALUE.prefix)
    }

    pub fn value(&mut self) -> CodecResult<&'a str> {
        self.inner.var_str(VALUE.prefix)
    }

    pub fn value_raw(&mut self) -> CodecResult<&'a [u8]> {
        self.inner.var_data(VALUE.prefix)
    }

    pub fn get_value(&mut self, dst: &mut [u8]) -> CodecResult<usize> {
        self.inner.copy_var_data(VALUE.prefix, dst)
    }

    pub fn skip_value(&mut self) -> CodecResult<usize> {
        self.inner.skip_var_data(VALUE.prefix)
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

impl fmt::Display for DynamicMapDecoder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display(), f)
    }
}

/// Owned `DynamicMap` value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicMap {
    pub key_type: i8,
    pub value_type: i8,
    pub key: String,
    pub value: String,
}

impl DynamicMap {
    pub fn encode(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = DynamicMapEncoder::wrap(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(encoder.encoded_length())
    }

    pub fn encode_with_header(&self, buf: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut encoder = DynamicMapEncoder::wrap_with_header(buf, offset)?;
        self.write(&mut encoder)?;
        Ok(wire::HEADER_SIZE + encoder.encoded_length())
    }

    fn write(&self, encoder: &mut DynamicMapEncoder<'_>) -> CodecResult<()> {
        encoder
            .key_type(self.key_type)?
            .value_type(self.value_type)?
            .key(&self.key)?
            .value(&self.value)?;
        Ok(())
    }

    pub fn decode(buf: &[u8], offset: usize, header: &MessageHeader) -> CodecResult<Self> {
        let mut decoder = DynamicMapDecoder::wrap(buf, offset, header.block_length, header.version)?;
        Self::read(&mut decoder)
    }

    pub(crate) fn read(decoder: &mut DynamicMapDecoder<'_>) -> CodecResult<Self> {
        Ok(Self {
            key_type: decoder.key_type()?,
            value_type: decoder.value_type()?,
            key: decoder.key()?.to_owned(),
            value: decoder.value()?.to_owned(),
        })
    }

    #[must_use]
    pub fn encoded_length(&self) -> usize {
        usize::from(DESCRIPTOR.block_length())
            + DynamicMapEncoder::key_header_length()
            + self.key.len()
            + DynamicMapEncoder::value_header_length()
            + self.value.len()
    }
}
