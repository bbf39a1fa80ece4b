//! Human-readable rendering of decoded messages.
//!
//! ```text
//! [Barrier](sbeTemplateId=15|sbeSchemaId=1|sbeSchemaVersion=0|sbeBlockLength=18):replicaVersion=3|epoch=9|destId=2|payloadBytes=hi
//! ```
//!
//! When the sender's version or block length differs from the descriptor's,
//! the acting value is shown first, as in `sbeBlockLength=20/18`. Groups
//! render as `name=[(..),(..)]`.

use std::fmt;

use schema::{BlockDef, CharacterEncoding, MessageDescriptor};

use crate::decoder::{DecodeBlock, MessageDecoder};
use crate::error::CodecResult;

/// Renders a message without moving the caller's decoder.
#[derive(Debug, Clone)]
pub struct MessageDisplay<'d, 'a> {
    descriptor: &'d MessageDescriptor,
    decoder: MessageDecoder<'a>,
}

impl<'a> MessageDecoder<'a> {
    /// Returns a renderer for this message as described by `descriptor`.
    #[must_use]
    pub fn display<'d>(&self, descriptor: &'d MessageDescriptor) -> MessageDisplay<'d, 'a> {
        MessageDisplay {
            descriptor,
            decoder: self.clone(),
        }
    }
}

impl fmt::Display for MessageDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut decoder = self.decoder.clone();
        decoder.rewind();
        let mut out = String::with_capacity(100);
        match render_into(&mut out, self.descriptor, &mut decoder) {
            Ok(()) => f.write_str(&out),
            Err(err) => write!(f, "{out}<{err}>"),
        }
    }
}

/// Renders the message under `decoder` to a string.
///
/// The decoder's cursor is left where it was.
#[must_use]
pub fn render_message(descriptor: &MessageDescriptor, decoder: &MessageDecoder<'_>) -> String {
    decoder.display(descriptor).to_string()
}

fn render_into(
    out: &mut String,
    descriptor: &MessageDescriptor,
    decoder: &mut MessageDecoder<'_>,
) -> CodecResult<()> {
    out.push('[');
    out.push_str(descriptor.name);
    out.push_str("](sbeTemplateId=");
    push_display(out, descriptor.template_id);
    out.push_str("|sbeSchemaId=");
    push_display(out, descriptor.schema_id);
    out.push_str("|sbeSchemaVersion=");
    if decoder.acting_version() != descriptor.schema_version {
        push_display(out, decoder.acting_version());
        out.push('/');
    }
    push_display(out, descriptor.schema_version);
    out.push_str("|sbeBlockLength=");
    if decoder.acting_block_length() != descriptor.block_length() {
        push_display(out, decoder.acting_block_length());
        out.push('/');
    }
    push_display(out, descriptor.block_length());
    out.push_str("):");
    render_block(out, decoder, &descriptor.body)
}

fn render_block<'a, B>(out: &mut String, block: &mut B, def: &BlockDef) -> CodecResult<()>
where
    B: DecodeBlock<'a> + ?Sized,
{
    let mut first = true;
    let mut separate = |out: &mut String| {
        if !first {
            out.push('|');
        }
        first = false;
    };

    for field in def.fields {
        separate(out);
        out.push_str(field.name);
        out.push('=');
        push_display(out, block.get_field(field)?);
    }

    for group in def.groups {
        separate(out);
        out.push_str(group.name);
        out.push_str("=[");
        if let Some(mut decoder) = block.group_since(group.since_version)? {
            let mut index = 0;
            while decoder.has_next() {
                if index > 0 {
                    out.push(',');
                }
                out.push('(');
                let mut element = decoder.next()?;
                render_block(out, &mut element, &group.body)?;
                out.push(')');
                index += 1;
            }
        }
        out.push(']');
    }

    for data in def.var_data {
        separate(out);
        out.push_str(data.name);
        out.push('=');
        let Some(bytes) = block.var_data_since(data.prefix, data.since_version)? else {
            continue;
        };
        match data.encoding {
            CharacterEncoding::Utf8 => out.push_str(&String::from_utf8_lossy(bytes)),
            CharacterEncoding::Raw => {
                for byte in bytes {
                    push_display(out, format_args!("{byte:02x}"));
                }
            }
        }
    }
    Ok(())
}

fn push_display(out: &mut String, value: impl fmt::Display) {
    out.push_str(&value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{EncodeBlock, MessageEncoder};
    use schema::{FieldDef, GroupDef, PrimitiveType, VarDataDef};
    use wire::LengthPrefix;

    const FIELDS: &[FieldDef] = &[
        FieldDef::new("seq", 1, 0, PrimitiveType::UInt32),
        FieldDef::new("kind", 2, 4, PrimitiveType::Int8),
    ];
    const ITEM_DATA: &[VarDataDef] = &[VarDataDef::new("bytes", 4, LengthPrefix::U16).raw()];
    const GROUPS: &[GroupDef] = &[GroupDef::new(
        "items",
        3,
        BlockDef::new(0).with_var_data(ITEM_DATA),
    )];
    const DATA: &[VarDataDef] = &[VarDataDef::new("note", 5, LengthPrefix::U16)];
    const SAMPLE: MessageDescriptor = MessageDescriptor {
        name: "Sample",
        template_id: 9,
        schema_id: 1,
        schema_version: 0,
        body: BlockDef::new(5)
            .with_fields(FIELDS)
            .with_groups(GROUPS)
            .with_var_data(DATA),
    };

    fn encode(buf: &mut [u8]) -> usize {
        let mut encoder = MessageEncoder::wrap(buf, 0, 5).unwrap();
        encoder.put(0, 12u32).unwrap();
        encoder.put(4, -1i8).unwrap();
        {
            let mut group = encoder.group(0, 2).unwrap();
            group.next().unwrap().put_var_data(LengthPrefix::U16, &[0xAB]).unwrap();
            group.next().unwrap().put_var_data(LengthPrefix::U16, &[]).unwrap();
        }
        encoder.put_str(LengthPrefix::U16, "hi").unwrap();
        encoder.encoded_length()
    }

    #[test]
    fn renders_fields_groups_and_var_data() {
        let mut buf = [0u8; 64];
        let len = encode(&mut buf);
        let decoder = MessageDecoder::wrap(&buf[..len], 0, 5, 0).unwrap();
        assert_eq!(
            render_message(&SAMPLE, &decoder),
            "[Sample](sbeTemplateId=9|sbeSchemaId=1|sbeSchemaVersion=0|sbeBlockLength=5):\
             seq=12|kind=-1|items=[(bytes=ab),(bytes=)]|note=hi"
        );
    }

    #[test]
    fn rendering_does_not_move_cursor() {
        let mut buf = [0u8; 64];
        let len = encode(&mut buf);
        let mut decoder = MessageDecoder::wrap(&buf[..len], 0, 5, 0).unwrap();
        assert_eq!(decoder.group().unwrap().count(), 2);
        let limit = decoder.limit();
        let rendered = decoder.display(&SAMPLE).to_string();
        assert!(rendered.ends_with("note=hi"));
        assert_eq!(decoder.limit(), limit);
    }

    #[test]
    fn acting_values_are_shown() {
        let mut buf = [0u8; 64];
        let len = encode(&mut buf);
        let decoder = MessageDecoder::wrap(&buf[..len], 0, 5, 2).unwrap();
        let rendered = render_message(&SAMPLE, &decoder);
        assert!(rendered.contains("sbeSchemaVersion=2/0"));
        assert!(rendered.contains("sbeBlockLength=5):"));
    }

    #[test]
    fn decode_errors_are_rendered_inline() {
        let mut buf = [0u8; 64];
        let len = encode(&mut buf);
        let decoder = MessageDecoder::wrap(&buf[..len - 1], 0, 5, 0).unwrap();
        let rendered = render_message(&SAMPLE, &decoder);
        assert!(rendered.contains("note=<"));
        assert!(rendered.contains("truncated"));
    }
}
