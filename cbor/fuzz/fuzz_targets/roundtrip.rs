#![no_main]

use grove_cbor::{Value, decode, encode};
use libfuzzer_sys::fuzz_target;

// Anything the decoder accepts is canonical, so it must re-encode to
// exactly the bytes it was read from
fuzz_target!(|data: &[u8]| {
    let Ok((value, rest)) = decode::decode_first(data) else {
        return;
    };
    let consumed = &data[..data.len() - rest.len()];

    let encoded = match &value {
        Value::Map(map) => encode::encode(map),
        other => encode::encode_value(other),
    }
    .expect("decoded value failed to encode");

    assert_eq!(encoded, consumed);
});
