//! Cursor protocol and record codecs for the blockwire message format.
//!
//! This is the runtime that generated message codecs delegate to. It ties
//! together buffer, wire and schema:
//!
//! - [`MessageEncoder`] / [`MessageDecoder`] wrap a caller-owned buffer at an
//!   offset and own the forward-only cursor for one pass.
//! - [`EncodeBlock`] / [`DecodeBlock`] give fixed-field, var-data and group
//!   access to a message body or a group element.
//! - [`GroupEncoder`] / [`GroupDecoder`] walk group elements strictly in
//!   order, depth-first.
//! - [`encode_message`] / [`decode_message`] drive the same machinery from a
//!   [`MessageDescriptor`](schema::MessageDescriptor) alone.
//!
//! # Record layout
//!
//! ```text
//! [fixed block][group sections, schema order][var-data sections, schema order]
//! group section    = [block_length u16][count u16][element]*
//! element          = [fixed element block][element groups][element var-data]
//! var-data section = [length u16|u32][payload]
//! ```
//!
//! # Example
//!
//! ```
//! use codec::{DecodeBlock, EncodeBlock, MessageDecoder, MessageEncoder};
//! use wire::LengthPrefix;
//!
//! let mut buf = [0u8; 64];
//! let mut encoder = MessageEncoder::wrap(&mut buf, 0, 10).unwrap();
//! encoder.put(0, 42u64).unwrap();
//! encoder.put(8, 7u16).unwrap();
//! encoder.put_str(LengthPrefix::U32, "tail").unwrap();
//! let len = encoder.encoded_length();
//! assert_eq!(len, 10 + 4 + 4);
//!
//! let mut decoder = MessageDecoder::wrap(&buf, 0, 10, 0).unwrap();
//! assert_eq!(decoder.get::<u64>(0).unwrap(), 42);
//! assert_eq!(decoder.get::<u16>(8).unwrap(), 7);
//! assert_eq!(decoder.var_str(LengthPrefix::U32).unwrap(), "tail");
//! assert_eq!(decoder.encoded_length(), len);
//! ```
//!
//! # Design Principles
//!
//! - **Zero-copy decode** - Var-data borrows from the input buffer.
//! - **No steady-state allocations** - Uses caller-provided buffers.
//! - **Forward compatible** - Acting block length and version gate every read.
//! - **Bounded** - Decode limits cap group counts, payload sizes and elements.

mod cursor;
mod decoder;
mod display;
mod dynamic;
mod encoder;
mod error;
mod limits;
mod value;

pub use cursor::{ReadCursor, WriteCursor};
pub use decoder::{DecodeBlock, ElementDecoder, GroupDecoder, MessageDecoder};
pub use display::{render_message, MessageDisplay};
pub use dynamic::{
    decode_message, decode_message_with_header, decode_record, encode_message,
    encode_message_with_header, encode_record,
};
pub use encoder::{ElementEncoder, EncodeBlock, GroupEncoder, MessageEncoder};
pub use error::{CodecError, CodecResult, LimitKind, RecordReason, ValueReason};
pub use limits::CodecLimits;
pub use value::Record;
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;
    use wire::LengthPrefix;

    #[test]
    fn public_api_exports() {
        let _ = WireLimits::default();
        let _ = CodecLimits::default();
        let _ = Record::default();
        let _: CodecResult<()> = Ok(());
    }

    // 64-bit field = 42, 16-bit field = 7, a group of two elements carrying
    // "a" and "bb", and a trailing "tail".
    #[test]
    fn concrete_scenario() {
        const BLOCK: u16 = 10;
        let mut buf = [0u8; 64];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0, BLOCK).unwrap();
        encoder.put(0, 42u64).unwrap();
        encoder.put(8, 7u16).unwrap();
        {
            let mut group = encoder.group(0, 2).unwrap();
            group.next().unwrap().put_str(LengthPrefix::U16, "a").unwrap();
            group.next().unwrap().put_str(LengthPrefix::U16, "bb").unwrap();
        }
        encoder.put_str(LengthPrefix::U32, "tail").unwrap();
        let encoded = encoder.encoded_length();
        assert_eq!(encoded, usize::from(BLOCK) + 4 + (2 + 1) + (2 + 2) + 4 + 4);

        let mut decoder = MessageDecoder::wrap(&buf, 0, BLOCK, 0).unwrap();
        assert_eq!(decoder.get::<u64>(0).unwrap(), 42);
        assert_eq!(decoder.get::<u16>(8).unwrap(), 7);
        {
            let mut group = decoder.group().unwrap();
            assert_eq!(group.count(), 2);
            assert_eq!(group.next().unwrap().var_str(LengthPrefix::U16).unwrap(), "a");
            assert_eq!(group.next().unwrap().var_str(LengthPrefix::U16).unwrap(), "bb");
            assert!(!group.has_next());
        }
        assert_eq!(decoder.var_str(LengthPrefix::U32).unwrap(), "tail");
        assert_eq!(decoder.encoded_length(), encoded);
    }

    #[test]
    fn encoder_can_be_read_back_in_place() {
        let mut buf = [0u8; 16];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0, 2).unwrap();
        encoder.put(0, 300u16).unwrap();
        encoder.put_str(LengthPrefix::U16, "x").unwrap();
        let mut decoder = encoder.as_decoder(0).unwrap();
        assert_eq!(decoder.get::<u16>(0).unwrap(), 300);
        assert_eq!(decoder.var_str(LengthPrefix::U16).unwrap(), "x");
    }
}
