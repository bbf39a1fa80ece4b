use codec::{
    decode_message, encode_message, CodecError, CodecLimits, DecodeBlock, EncodeBlock,
    MessageDecoder, MessageEncoder, Record,
};
use proptest::prelude::*;
use schema::{BlockDef, FieldDef, GroupDef, MessageDescriptor, PrimitiveType, ScalarValue, VarDataDef};
use wire::LengthPrefix;

const ENTRY_FIELDS: &[FieldDef] = &[
    FieldDef::new("slot", 11, 0, PrimitiveType::UInt16),
    FieldDef::new("delta", 12, 2, PrimitiveType::Int32),
];
const ENTRY_DATA: &[VarDataDef] = &[VarDataDef::new("blob", 13, LengthPrefix::U16).raw()];
const GROUPS: &[GroupDef] = &[GroupDef::new(
    "entries",
    10,
    BlockDef::new(6)
        .with_fields(ENTRY_FIELDS)
        .with_var_data(ENTRY_DATA),
)];
const FIELDS: &[FieldDef] = &[
    FieldDef::new("replicaVersion", 1, 0, PrimitiveType::UInt64),
    FieldDef::new("destId", 2, 8, PrimitiveType::UInt16),
    FieldDef::new("kind", 3, 10, PrimitiveType::Int8),
];
const DATA: &[VarDataDef] = &[
    VarDataDef::new("key", 20, LengthPrefix::U16),
    VarDataDef::new("payload", 21, LengthPrefix::U32).raw(),
];

const RECORD: MessageDescriptor = MessageDescriptor {
    name: "Record",
    template_id: 3,
    schema_id: 7,
    schema_version: 0,
    body: BlockDef::new(11)
        .with_fields(FIELDS)
        .with_groups(GROUPS)
        .with_var_data(DATA),
};

fn entry_strategy() -> impl Strategy<Value = Record> {
    (
        0u16..=u16::MAX - 1,
        (i32::MIN + 1)..=i32::MAX,
        prop::collection::vec(any::<u8>(), 0..8),
    )
        .prop_map(|(slot, delta, blob)| {
            Record::new(
                vec![ScalarValue::UInt16(slot), ScalarValue::Int32(delta)],
                Vec::new(),
                vec![blob],
            )
        })
}

fn record_strategy(max_entries: usize) -> impl Strategy<Value = Record> {
    (
        0u64..=u64::MAX - 1,
        0u16..=u16::MAX - 1,
        (i8::MIN + 1)..=i8::MAX,
        prop::collection::vec(entry_strategy(), 0..=max_entries),
        "[a-z]{0,16}",
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(version, dest, kind, entries, key, payload)| {
            Record::new(
                vec![
                    ScalarValue::UInt64(version),
                    ScalarValue::UInt16(dest),
                    ScalarValue::Int8(kind),
                ],
                vec![entries],
                vec![key.into_bytes(), payload],
            )
        })
}

fn encoded_size(record: &Record) -> usize {
    let entries: usize = record.groups[0]
        .iter()
        .map(|e| 6 + 2 + e.var_data[0].len())
        .sum();
    11 + 4 + entries + 2 + record.var_data[0].len() + 4 + record.var_data[1].len()
}

proptest! {
    #[test]
    fn prop_roundtrip_records(record in record_strategy(32)) {
        let mut buf = vec![0u8; encoded_size(&record)];
        let written = encode_message(&RECORD, &record, &mut buf, 0).unwrap();
        prop_assert_eq!(written, buf.len());

        let (decoded, consumed) =
            decode_message(&RECORD, &buf, 0, 11, 0, &CodecLimits::default()).unwrap();
        prop_assert_eq!(consumed, written);
        prop_assert_eq!(decoded, record);
    }

    #[test]
    fn prop_group_counts_up_to_stress(count in 0usize..=1000) {
        let mut buf = vec![0u8; 4 + count * 3];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0, 0).unwrap();
        {
            let mut group = encoder.group(3, count).unwrap();
            for i in 0..count {
                let mut element = group.next().unwrap();
                element.put(0, (i % 65534) as u16).unwrap();
                element.put(2, (i % 255) as u8).unwrap();
            }
            let exhausted = matches!(group.next(), Err(CodecError::GroupExhausted { .. }));
            prop_assert!(exhausted, "next past count must exhaust");
        }
        let written = encoder.encoded_length();
        prop_assert_eq!(written, 4 + count * 3);

        let mut decoder = MessageDecoder::wrap(&buf, 0, 0, 0).unwrap();
        let mut group = decoder.group().unwrap();
        prop_assert_eq!(group.count(), count);
        let mut seen = 0;
        while group.has_next() {
            let element = group.next().unwrap();
            prop_assert_eq!(element.get::<u16>(0).unwrap(), (seen % 65534) as u16);
            prop_assert_eq!(element.get::<u8>(2).unwrap(), (seen % 255) as u8);
            seen += 1;
        }
        prop_assert_eq!(seen, count);
        drop(group);
        prop_assert_eq!(decoder.encoded_length(), written);
    }

    #[test]
    fn prop_limit_is_monotonic(record in record_strategy(8)) {
        let mut buf = vec![0u8; encoded_size(&record)];
        encode_message(&RECORD, &record, &mut buf, 0).unwrap();

        let mut decoder = MessageDecoder::wrap(&buf, 0, 11, 0).unwrap();
        let mut last = decoder.limit();
        {
            let mut group = decoder.group().unwrap();
            while group.has_next() {
                let mut element = group.next().unwrap();
                element.var_data(LengthPrefix::U16).unwrap();
            }
        }
        prop_assert!(decoder.limit() >= last);
        last = decoder.limit();
        decoder.var_data_length(LengthPrefix::U16).unwrap();
        prop_assert_eq!(decoder.limit(), last);
        decoder.var_str(LengthPrefix::U16).unwrap();
        prop_assert!(decoder.limit() >= last);
        last = decoder.limit();
        decoder.var_data(LengthPrefix::U32).unwrap();
        prop_assert!(decoder.limit() >= last);
        prop_assert_eq!(decoder.encoded_length(), buf.len());
    }

    #[test]
    fn prop_length_peek_is_idempotent(payload in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut buf = vec![0u8; 2 + payload.len()];
        let mut encoder = MessageEncoder::wrap(&mut buf, 0, 0).unwrap();
        encoder.put_var_data(LengthPrefix::U16, &payload).unwrap();

        let mut decoder = MessageDecoder::wrap(&buf, 0, 0, 0).unwrap();
        let first = decoder.var_data_length(LengthPrefix::U16).unwrap();
        let second = decoder.var_data_length(LengthPrefix::U16).unwrap();
        prop_assert_eq!(first, payload.len());
        prop_assert_eq!(first, second);
        prop_assert_eq!(decoder.limit(), 0);
        prop_assert_eq!(decoder.var_data(LengthPrefix::U16).unwrap(), &payload[..]);
        prop_assert_eq!(decoder.limit(), 2 + payload.len());
    }

    #[test]
    fn prop_decode_arbitrary_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let limits = CodecLimits::for_testing();
        let _ = decode_message(&RECORD, &bytes, 0, 11, 0, &limits);
    }
}

#[test]
fn overflow_leaves_limit_unchanged() {
    let mut buf = vec![0u8; 70_000];
    let mut encoder = MessageEncoder::wrap(&mut buf, 0, 4).unwrap();
    encoder.put_str(LengthPrefix::U16, "ok").unwrap();
    let before = encoder.limit();
    let err = encoder
        .put_var_data(LengthPrefix::U16, &vec![1u8; LengthPrefix::U16.max_length() + 1])
        .unwrap_err();
    assert!(matches!(err, CodecError::LengthOverflow { .. }));
    assert_eq!(encoder.limit(), before);
}

#[test]
fn u32_prefix_boundary_is_checked_before_writing() {
    let mut buf = [0u8; 16];
    let mut encoder = MessageEncoder::wrap(&mut buf, 0, 0).unwrap();
    // Only the length is inspected; no payload of this size is needed.
    let err = LengthPrefix::U32
        .check_length(LengthPrefix::U32.max_length() + 1)
        .unwrap_err();
    assert!(matches!(err, wire::EncodeError::LengthOverflow { .. }));
    encoder.put_var_data(LengthPrefix::U32, &[]).unwrap();
    assert_eq!(encoder.encoded_length(), 4);
}
