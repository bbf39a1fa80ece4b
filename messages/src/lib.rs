//! Replication messages (schema 1, version 0).
//!
//! Each message module holds the constant [`MessageDescriptor`] a schema
//! compiler would emit, typed encoder/decoder wrappers over the codec
//! runtime, and an owned value type:
//!
//! | message      | template | block | trailing data                 |
//! |--------------|----------|-------|-------------------------------|
//! | [`Message`]    | 1        | 10    | `segments` group of UTF-8 blobs |
//! | [`Barrier`]    | 15       | 18    | `payloadBytes`                |
//! | [`DynamicMap`] | 25       | 2     | `key`, `value`                |
//!
//! Incoming frames are routed once by [`decode_any`], which reads the
//! message header and returns the matching [`AnyDecoder`] variant.
//!
//! ```
//! use messages::{decode_any, AnyDecoder, Barrier};
//!
//! let barrier = Barrier { replica_version: 3, epoch: 9, dest_id: 2, payload: "hi".into() };
//! let mut buf = [0u8; 64];
//! let len = barrier.encode_with_header(&mut buf, 0).unwrap();
//!
//! let (_, decoder) = decode_any(&buf[..len], 0, &Default::default(), &Default::default()).unwrap();
//! let AnyDecoder::Barrier(decoder) = decoder else { unreachable!() };
//! assert_eq!(decoder.epoch().unwrap(), 9);
//! ```

mod any;
pub mod barrier;
pub mod dynamic_map;
pub mod message;
mod meta;

use schema::{MessageDescriptor, Schema, SchemaResult};

pub use any::{decode_any, decode_any_message, AnyDecoder, AnyMessage};
pub use barrier::{Barrier, BarrierDecoder, BarrierEncoder};
pub use dynamic_map::{DynamicMap, DynamicMapDecoder, DynamicMapEncoder};
pub use message::{
    Message, MessageDecoder, MessageEncoder, SegmentDecoder, SegmentEncoder, SegmentsDecoder,
    SegmentsEncoder,
};

pub const SCHEMA_ID: u16 = 1;
pub const SCHEMA_VERSION: u16 = 0;

/// Every message of the schema, in template order.
pub const DESCRIPTORS: [MessageDescriptor; 3] = [
    message::DESCRIPTOR,
    barrier::DESCRIPTOR,
    dynamic_map::DESCRIPTOR,
];

/// Builds and validates the schema.
pub fn schema() -> SchemaResult<Schema> {
    Schema::new(SCHEMA_ID, SCHEMA_VERSION, DESCRIPTORS.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{CodecError, CodecLimits};
    use wire::{MessageHeader, HEADER_SIZE};

    #[test]
    fn schema_is_valid() {
        let schema = schema().unwrap();
        assert_eq!(schema.find(1).map(|m| m.name), Some("Message"));
        assert_eq!(schema.find(15).map(|m| m.name), Some("Barrier"));
        assert_eq!(schema.find(25).map(|m| m.name), Some("DynamicMap"));
        assert_eq!(schema::schema_hash(&schema), schema::schema_hash(&schema));
    }

    #[test]
    fn dispatches_each_template() {
        let messages: [AnyMessage; 3] = [
            Message {
                replica_version: 1,
                dest_id: 2,
                segments: vec!["s".into()],
            }
            .into(),
            Barrier {
                replica_version: 1,
                epoch: 2,
                dest_id: 3,
                payload: "p".into(),
            }
            .into(),
            DynamicMap {
                key_type: 1,
                value_type: 1,
                key: "k".into(),
                value: "v".into(),
            }
            .into(),
        ];
        for message in messages {
            let mut buf = [0u8; 64];
            let len = message.encode(&mut buf, 0).unwrap();
            assert_eq!(len, message.encoded_length());

            let (header, decoder) =
                decode_any(&buf[..len], 0, &wire::Limits::default(), &CodecLimits::default())
                    .unwrap();
            assert_eq!(decoder.template_id(), header.template_id);
            assert_eq!(decoder.descriptor(), message.descriptor());

            let (decoded, consumed) = decode_any_message(
                &buf[..len],
                0,
                &wire::Limits::default(),
                &CodecLimits::default(),
            )
            .unwrap();
            assert_eq!(decoded, message);
            assert_eq!(consumed, len);
        }
    }

    #[test]
    fn rejects_foreign_schema() {
        let mut buf = [0u8; 16];
        wire::encode_header(&MessageHeader::new(2, 25, 9, 0), &mut buf).unwrap();
        let err = decode_any(&buf, 0, &wire::Limits::default(), &CodecLimits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::SchemaMismatch {
                expected: 1,
                found: 9
            }
        ));
    }

    #[test]
    fn rejects_unknown_template() {
        let mut buf = [0u8; 16];
        wire::encode_header(&MessageHeader::new(2, 99, SCHEMA_ID, 0), &mut buf).unwrap();
        let err = decode_any(&buf, 0, &wire::Limits::default(), &CodecLimits::default())
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownTemplate { template_id: 99 }));
    }

    #[test]
    fn truncated_body_is_rejected() {
        let mut buf = [0u8; HEADER_SIZE + 4];
        wire::encode_header(&barrier::DESCRIPTOR.header(), &mut buf).unwrap();
        assert!(decode_any(&buf, 0, &wire::Limits::default(), &CodecLimits::default()).is_err());
    }
}
