#![no_main]

use codec::CodecLimits;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let wire_limits = wire::Limits::for_testing();
    let limits = CodecLimits::for_testing();

    // Walk the input as a stream of back-to-back frames.
    let mut offset = 0usize;
    while offset < data.len() {
        match messages::decode_any_message(data, offset, &wire_limits, &limits) {
            Ok((message, consumed)) => {
                // Sentinel values decode but are refused on encode.
                let mut out = vec![0u8; message.encoded_length()];
                if let Ok(written) = message.encode(&mut out, 0) {
                    assert_eq!(written, out.len());
                    let again = messages::decode_any_message(&out, 0, &wire_limits, &limits);
                    assert_eq!(again.ok(), Some((message, written)));
                }
                offset += consumed.max(1);
            }
            Err(_) => break,
        }
    }

    // Rendering must tolerate any body.
    if let Ok((_, decoder)) = messages::decode_any(data, 0, &wire_limits, &limits) {
        let _ = decoder.to_string();
    }
});
