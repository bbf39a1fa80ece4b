//! Descriptor-driven encode and decode of whole records.
//!
//! These walk a [`BlockDef`] and drive the same block codecs a generated
//! message would, in schema order: fixed fields, then groups depth-first,
//! then var-data.

use schema::{BlockDef, CharacterEncoding, MessageDescriptor};
use wire::HEADER_SIZE;

use crate::decoder::{DecodeBlock, MessageDecoder};
use crate::encoder::{EncodeBlock, MessageEncoder};
use crate::error::{CodecError, CodecResult, RecordReason};
use crate::limits::CodecLimits;
use crate::value::Record;

/// Encodes `record` into `block` following `def`.
pub fn encode_record<'a, B>(block: &mut B, def: &BlockDef, record: &Record) -> CodecResult<()>
where
    B: EncodeBlock<'a> + ?Sized,
{
    check_shape(def, record)?;

    for (field, value) in def.fields.iter().zip(&record.fields) {
        block.put_scalar(field, *value)?;
    }

    for (group, elements) in def.groups.iter().zip(&record.groups) {
        let mut encoder = block.group(group.body.block_length, elements.len())?;
        for element in elements {
            let mut element_encoder = encoder.next()?;
            encode_record(&mut element_encoder, &group.body, element)?;
        }
    }

    for (data, bytes) in def.var_data.iter().zip(&record.var_data) {
        if data.encoding == CharacterEncoding::Utf8 && std::str::from_utf8(bytes).is_err() {
            return Err(CodecError::RecordMismatch {
                reason: RecordReason::NotUtf8 { name: data.name },
            });
        }
        block.put_var_data(data.prefix, bytes)?;
    }
    Ok(())
}

/// Decodes a record from `block` following `def`.
pub fn decode_record<'a, B>(block: &mut B, def: &BlockDef) -> CodecResult<Record>
where
    B: DecodeBlock<'a> + ?Sized,
{
    let fields = def
        .fields
        .iter()
        .map(|field| block.get_field(field))
        .collect::<CodecResult<Vec<_>>>()?;

    let mut groups = Vec::with_capacity(def.groups.len());
    for group in def.groups {
        let mut elements = Vec::new();
        if let Some(mut decoder) = block.group_since(group.since_version)? {
            elements.reserve(decoder.count());
            while decoder.has_next() {
                let mut element = decoder.next()?;
                elements.push(decode_record(&mut element, &group.body)?);
            }
        }
        groups.push(elements);
    }

    let mut var_data = Vec::with_capacity(def.var_data.len());
    for data in def.var_data {
        if block.acting_version() < data.since_version {
            var_data.push(Vec::new());
            continue;
        }
        let bytes = match data.encoding {
            CharacterEncoding::Utf8 => block.var_str(data.prefix)?.as_bytes(),
            CharacterEncoding::Raw => block.var_data(data.prefix)?,
        };
        var_data.push(bytes.to_vec());
    }

    Ok(Record {
        fields,
        groups,
        var_data,
    })
}

/// Encodes a message body at `offset` and returns its encoded length.
pub fn encode_message(
    descriptor: &MessageDescriptor,
    record: &Record,
    buf: &mut [u8],
    offset: usize,
) -> CodecResult<usize> {
    let mut encoder = MessageEncoder::wrap(buf, offset, descriptor.block_length())?;
    encode_record(&mut encoder, &descriptor.body, record)?;
    Ok(encoder.encoded_length())
}

/// Encodes header and body at `offset` and returns the total length.
pub fn encode_message_with_header(
    descriptor: &MessageDescriptor,
    record: &Record,
    buf: &mut [u8],
    offset: usize,
) -> CodecResult<usize> {
    let mut encoder = MessageEncoder::wrap_with_header(buf, offset, &descriptor.header())?;
    encode_record(&mut encoder, &descriptor.body, record)?;
    Ok(HEADER_SIZE + encoder.encoded_length())
}

/// Decodes a message body at `offset` using the sender's acting block length
/// and version. Returns the record and the bytes consumed.
pub fn decode_message(
    descriptor: &MessageDescriptor,
    buf: &[u8],
    offset: usize,
    acting_block_length: u16,
    acting_version: u16,
    limits: &CodecLimits,
) -> CodecResult<(Record, usize)> {
    let mut decoder = MessageDecoder::wrap_with_limits(
        buf,
        offset,
        acting_block_length,
        acting_version,
        limits,
    )?;
    let record = decode_record(&mut decoder, &descriptor.body)?;
    Ok((record, decoder.encoded_length()))
}

/// Decodes header and body at `offset`. Returns the record and the bytes
/// consumed including the header.
///
/// The header must name `descriptor`'s schema and template.
pub fn decode_message_with_header(
    descriptor: &MessageDescriptor,
    buf: &[u8],
    offset: usize,
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<(Record, usize)> {
    let (header, mut decoder) = MessageDecoder::wrap_with_header(buf, offset, wire_limits, limits)?;
    if header.schema_id != descriptor.schema_id {
        return Err(CodecError::SchemaMismatch {
            expected: descriptor.schema_id,
            found: header.schema_id,
        });
    }
    if header.template_id != descriptor.template_id {
        return Err(CodecError::UnknownTemplate {
            template_id: header.template_id,
        });
    }
    let record = decode_record(&mut decoder, &descriptor.body)?;
    let consumed = HEADER_SIZE + decoder.encoded_length();
    wire_limits.check_message_bytes(consumed)?;
    Ok((record, consumed))
}

fn check_shape(def: &BlockDef, record: &Record) -> CodecResult<()> {
    let reason = if record.fields.len() != def.fields.len() {
        RecordReason::FieldCount {
            expected: def.fields.len(),
            actual: record.fields.len(),
        }
    } else if record.groups.len() != def.groups.len() {
        RecordReason::GroupCount {
            expected: def.groups.len(),
            actual: record.groups.len(),
        }
    } else if record.var_data.len() != def.var_data.len() {
        RecordReason::VarDataCount {
            expected: def.var_data.len(),
            actual: record.var_data.len(),
        }
    } else {
        return Ok(());
    };
    Err(CodecError::RecordMismatch { reason })
}
