#![no_main]

use grove_cbor::Value;
use libfuzzer_sys::fuzz_target;

// Visits every node without recursing, deep input is the interesting case
fn count_nodes(value: &Value) -> usize {
    let mut pending = vec![value];
    let mut count = 0;
    while let Some(value) = pending.pop() {
        count += 1;
        match value {
            Value::Array(items) => pending.extend(items),
            Value::Map(map) => pending.extend(map.values()),
            _ => {}
        }
    }
    count
}

fuzz_target!(|data: &[u8]| {
    if let Ok((value, rest)) = grove_cbor::decode::decode_first(data) {
        assert!(count_nodes(&value) <= data.len() - rest.len());
    }
});
