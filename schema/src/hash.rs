//! Deterministic schema hashing.
//!
//! The fingerprint covers everything that affects the byte layout: ids,
//! versions, block lengths, offsets, scalar types, presence, prefix widths
//! and encodings. Names are not hashed, so renaming a field keeps peers
//! compatible.

use blake3::Hasher;
use wire::LengthPrefix;

use crate::{BlockDef, CharacterEncoding, MessageDescriptor, Presence, Schema};

/// Computes a deterministic hash for schema compatibility checks.
#[must_use]
pub fn schema_hash(schema: &Schema) -> u64 {
    let mut hasher = Hasher::new();
    write_u16(&mut hasher, schema.id);
    write_u16(&mut hasher, schema.version);
    write_u32(&mut hasher, schema.messages.len() as u32);

    for message in &schema.messages {
        write_message(&mut hasher, message);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(prefix)
}

fn write_message(hasher: &mut Hasher, message: &MessageDescriptor) {
    write_u16(hasher, message.template_id);
    write_u16(hasher, message.schema_id);
    write_u16(hasher, message.schema_version);
    write_block(hasher, &message.body);
}

fn write_block(hasher: &mut Hasher, block: &BlockDef) {
    write_u16(hasher, block.block_length);

    write_u32(hasher, block.fields.len() as u32);
    for field in block.fields {
        write_u16(hasher, field.id);
        write_u16(hasher, field.offset);
        write_u8(hasher, field.primitive as u8);
        write_u16(hasher, field.since_version);
        write_u8(
            hasher,
            match field.presence {
                Presence::Required => 0,
                Presence::Optional => 1,
            },
        );
    }

    write_u32(hasher, block.groups.len() as u32);
    for group in block.groups {
        write_u16(hasher, group.id);
        write_u16(hasher, group.since_version);
        write_block(hasher, &group.body);
    }

    write_u32(hasher, block.var_data.len() as u32);
    for def in block.var_data {
        write_u16(hasher, def.id);
        write_u16(hasher, def.since_version);
        write_u8(
            hasher,
            match def.prefix {
                LengthPrefix::U16 => 2,
                LengthPrefix::U32 => 4,
            },
        );
        write_u8(
            hasher,
            match def.encoding {
                CharacterEncoding::Utf8 => 0,
                CharacterEncoding::Raw => 1,
            },
        );
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}
