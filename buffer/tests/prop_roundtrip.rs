use buffer::{BufferError, ReadBuf, WriteBuf};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Bytes(Vec<u8>),
}

impl Op {
    fn width(&self) -> usize {
        match self {
            Self::U8(_) | Self::I8(_) => 1,
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) | Self::I32(_) => 4,
            Self::U64(_) | Self::I64(_) => 8,
            Self::Bytes(b) => b.len(),
        }
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u8>().prop_map(Op::U8),
        any::<i8>().prop_map(Op::I8),
        any::<u16>().prop_map(Op::U16),
        any::<i16>().prop_map(Op::I16),
        any::<u32>().prop_map(Op::U32),
        any::<i32>().prop_map(Op::I32),
        any::<u64>().prop_map(Op::U64),
        any::<i64>().prop_map(Op::I64),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Op::Bytes),
    ]
}

proptest! {
    #[test]
    fn prop_roundtrip_ops(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let total: usize = ops.iter().map(Op::width).sum();
        let mut data = vec![0u8; total];
        let mut writer = WriteBuf::new(&mut data);

        let mut offset = 0usize;
        for op in &ops {
            match op {
                Op::U8(v) => writer.put(offset, *v).unwrap(),
                Op::I8(v) => writer.put(offset, *v).unwrap(),
                Op::U16(v) => writer.put(offset, *v).unwrap(),
                Op::I16(v) => writer.put(offset, *v).unwrap(),
                Op::U32(v) => writer.put(offset, *v).unwrap(),
                Op::I32(v) => writer.put(offset, *v).unwrap(),
                Op::U64(v) => writer.put(offset, *v).unwrap(),
                Op::I64(v) => writer.put(offset, *v).unwrap(),
                Op::Bytes(b) => writer.put_bytes(offset, b).unwrap(),
            }
            offset += op.width();
        }

        let reader = ReadBuf::new(&data);
        let mut offset = 0usize;
        for op in &ops {
            match op {
                Op::U8(v) => prop_assert_eq!(reader.get::<u8>(offset).unwrap(), *v),
                Op::I8(v) => prop_assert_eq!(reader.get::<i8>(offset).unwrap(), *v),
                Op::U16(v) => prop_assert_eq!(reader.get::<u16>(offset).unwrap(), *v),
                Op::I16(v) => prop_assert_eq!(reader.get::<i16>(offset).unwrap(), *v),
                Op::U32(v) => prop_assert_eq!(reader.get::<u32>(offset).unwrap(), *v),
                Op::I32(v) => prop_assert_eq!(reader.get::<i32>(offset).unwrap(), *v),
                Op::U64(v) => prop_assert_eq!(reader.get::<u64>(offset).unwrap(), *v),
                Op::I64(v) => prop_assert_eq!(reader.get::<i64>(offset).unwrap(), *v),
                Op::Bytes(b) => prop_assert_eq!(reader.bytes(offset, b.len()).unwrap(), b.as_slice()),
            }
            offset += op.width();
        }
    }

    #[test]
    fn prop_reads_never_panic(data in prop::collection::vec(any::<u8>(), 0..32), offset in 0usize..64) {
        let reader = ReadBuf::new(&data);
        match reader.get::<u64>(offset) {
            Ok(_) => prop_assert!(offset + 8 <= data.len()),
            Err(BufferError::UnexpectedEof { available, .. }) => prop_assert_eq!(available, data.len()),
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }
}
