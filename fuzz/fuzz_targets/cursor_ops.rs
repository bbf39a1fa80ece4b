#![no_main]

use codec::{CodecLimits, DecodeBlock, MessageDecoder};
use libfuzzer_sys::fuzz_target;
use wire::LengthPrefix;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let block = u16::from(first % 32);
    let Ok(mut decoder) =
        MessageDecoder::wrap_with_limits(rest, 0, block, 0, &CodecLimits::for_testing())
    else {
        return;
    };

    // Use input bytes to drive a bounded sequence of operations.
    for &op in rest.iter().take(64) {
        let before = decoder.limit();
        let ok = match op % 5 {
            0 => decoder.get::<u64>(usize::from(op % 16)).is_ok(),
            1 => decoder.var_data(LengthPrefix::U16).is_ok(),
            2 => decoder.var_data(LengthPrefix::U32).is_ok(),
            3 => decoder.var_data_length(LengthPrefix::U16).is_ok(),
            _ => match decoder.group() {
                Ok(mut group) => {
                    while group.has_next() {
                        if group.next().is_err() {
                            break;
                        }
                    }
                    true
                }
                Err(_) => false,
            },
        };
        assert!(decoder.limit() >= before);
        if !ok {
            break;
        }
    }
});
