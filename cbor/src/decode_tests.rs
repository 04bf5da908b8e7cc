use super::cid::{self, Cid, Codec};
use super::decode::*;
use super::encode::{encode, encode_value};
use super::*;
use hex_literal::hex;

fn kind(data: &[u8]) -> ErrorKind {
    decode(data).unwrap_err().kind
}

#[test]
fn rfc_tests() {
    // RFC 8949, Appendix A, restricted to the canonical subset:
    // https://www.rfc-editor.org/rfc/rfc8949.html#section-appendix.a

    assert_eq!(decode(&hex!("00")).unwrap(), Value::Integer(0));
    assert_eq!(decode(&hex!("01")).unwrap(), Value::Integer(1));
    assert_eq!(decode(&hex!("0a")).unwrap(), Value::Integer(10));
    assert_eq!(decode(&hex!("17")).unwrap(), Value::Integer(23));
    assert_eq!(decode(&hex!("1818")).unwrap(), Value::Integer(24));
    assert_eq!(decode(&hex!("1819")).unwrap(), Value::Integer(25));
    assert_eq!(decode(&hex!("1864")).unwrap(), Value::Integer(100));
    assert_eq!(decode(&hex!("1903e8")).unwrap(), Value::Integer(1000));
    assert_eq!(decode(&hex!("1a000f4240")).unwrap(), Value::Integer(1000000));
    assert_eq!(
        decode(&hex!("1b000000e8d4a51000")).unwrap(),
        Value::Integer(1000000000000)
    );
    assert_eq!(
        decode(&hex!("1bffffffffffffffff")).unwrap(),
        Value::Integer(18446744073709551615)
    );
    assert_eq!(
        decode(&hex!("3bffffffffffffffff")).unwrap(),
        Value::Integer(-18446744073709551616)
    );
    assert_eq!(decode(&hex!("20")).unwrap(), Value::Integer(-1));
    assert_eq!(decode(&hex!("29")).unwrap(), Value::Integer(-10));
    assert_eq!(decode(&hex!("3863")).unwrap(), Value::Integer(-100));
    assert_eq!(decode(&hex!("3903e7")).unwrap(), Value::Integer(-1000));

    /* We do not support BIGNUMs */
    assert_eq!(
        kind(&hex!("c249010000000000000000")),
        ErrorKind::UnsupportedTag(2)
    );

    assert_eq!(decode(&hex!("fb3ff199999999999a")).unwrap(), Value::Float(1.1));
    assert_eq!(
        decode(&hex!("fb7e37e43c8800759c")).unwrap(),
        Value::Float(1.0e+300)
    );
    assert_eq!(decode(&hex!("fbc010666666666666")).unwrap(), Value::Float(-4.1));

    assert_eq!(decode(&hex!("f4")).unwrap(), Value::Bool(false));
    assert_eq!(decode(&hex!("f5")).unwrap(), Value::Bool(true));
    assert_eq!(decode(&hex!("f6")).unwrap(), Value::Null);

    assert_eq!(decode(&hex!("40")).unwrap(), Value::Bytes(Vec::new()));
    assert_eq!(
        decode(&hex!("4401020304")).unwrap(),
        Value::Bytes(hex!("01020304").to_vec())
    );
    assert_eq!(decode(&hex!("60")).unwrap(), Value::from(""));
    assert_eq!(decode(&hex!("6161")).unwrap(), Value::from("a"));
    assert_eq!(decode(&hex!("6449455446")).unwrap(), Value::from("IETF"));
    assert_eq!(decode(&hex!("62225c")).unwrap(), Value::from("\"\\"));
    assert_eq!(decode(&hex!("62c3bc")).unwrap(), Value::from("\u{00fc}"));
    assert_eq!(decode(&hex!("63e6b0b4")).unwrap(), Value::from("\u{6c34}"));
    assert_eq!(decode(&hex!("64f0908591")).unwrap(), Value::from("\u{10151}"));

    assert_eq!(decode(&hex!("80")).unwrap(), Value::Array(Vec::new()));
    assert_eq!(
        decode(&hex!("83010203")).unwrap(),
        Value::Array(vec![1.into(), 2.into(), 3.into()])
    );
    assert_eq!(
        decode(&hex!("8301820203820405")).unwrap(),
        Value::Array(vec![
            1.into(),
            vec![Value::from(2), 3.into()].into(),
            vec![Value::from(4), 5.into()].into(),
        ])
    );
    assert_eq!(
        decode(&hex!(
            "98190102030405060708090a0b0c0d0e0f101112131415161718181819"
        ))
        .unwrap(),
        Value::Array((1..=25).map(Value::from).collect())
    );

    assert_eq!(decode(&hex!("a0")).unwrap(), Value::Map(Map::new()));
    let m = decode(&hex!("a26161016162820203"))
        .unwrap()
        .into_map()
        .unwrap();
    assert_eq!(m.len(), 2);
    assert_eq!(m["a"], Value::Integer(1));
    assert_eq!(m["b"], Value::Array(vec![2.into(), 3.into()]));

    let a = decode(&hex!("826161a161626163"))
        .unwrap()
        .into_array()
        .unwrap();
    assert_eq!(a[0], Value::from("a"));
    assert_eq!(a[1].as_map().unwrap()["b"], Value::from("c"));

    // Indefinite length items are not part of the canonical subset
    assert_eq!(kind(&hex!("5f42010243030405ff")), ErrorKind::IndefiniteLength(2));
    assert_eq!(kind(&hex!("7f657374726561646d696e67ff")), ErrorKind::IndefiniteLength(3));
    assert_eq!(kind(&hex!("9fff")), ErrorKind::IndefiniteLength(4));
    assert_eq!(kind(&hex!("bf61610161629f0203ffff")), ErrorKind::IndefiniteLength(5));
}

#[test]
fn minimal_arguments() {
    // 10 fits in the initial byte
    assert_eq!(decode(&hex!("0a")).unwrap(), Value::Integer(10));
    assert_eq!(
        kind(&hex!("19000a")),
        ErrorKind::NonMinimal {
            value: 10,
            minor: 25
        }
    );

    assert_eq!(
        kind(&hex!("1817")),
        ErrorKind::NonMinimal {
            value: 23,
            minor: 24
        }
    );
    assert_eq!(
        kind(&hex!("1900ff")),
        ErrorKind::NonMinimal {
            value: 255,
            minor: 25
        }
    );
    assert_eq!(decode(&hex!("190100")).unwrap(), Value::Integer(256));
    assert_eq!(
        kind(&hex!("1a0000ffff")),
        ErrorKind::NonMinimal {
            value: 65535,
            minor: 26
        }
    );
    assert_eq!(decode(&hex!("1a00010000")).unwrap(), Value::Integer(65536));
    assert_eq!(
        kind(&hex!("1b00000000ffffffff")),
        ErrorKind::NonMinimal {
            value: 4294967295,
            minor: 27
        }
    );
    assert_eq!(
        decode(&hex!("1b0000000100000000")).unwrap(),
        Value::Integer(4294967296)
    );

    // Applies to lengths and counts as well as integers
    assert!(matches!(kind(&hex!("5801ff")), ErrorKind::NonMinimal { .. }));
    assert!(matches!(kind(&hex!("780161")), ErrorKind::NonMinimal { .. }));
    assert!(matches!(kind(&hex!("980101")), ErrorKind::NonMinimal { .. }));
    assert!(matches!(kind(&hex!("b8016161 01")), ErrorKind::NonMinimal { .. }));
    assert!(matches!(kind(&hex!("3817")), ErrorKind::NonMinimal { .. }));
}

#[test]
fn reserved_minor_values() {
    assert_eq!(
        kind(&hex!("1c")),
        ErrorKind::InvalidMinorValue { major: 0, minor: 28 }
    );
    assert_eq!(
        kind(&hex!("3e")),
        ErrorKind::InvalidMinorValue { major: 1, minor: 30 }
    );
    assert_eq!(
        kind(&hex!("1f")),
        ErrorKind::InvalidMinorValue { major: 0, minor: 31 }
    );
    assert_eq!(
        kind(&hex!("fc")),
        ErrorKind::InvalidMinorValue { major: 7, minor: 28 }
    );
    assert_eq!(kind(&hex!("ff")), ErrorKind::IndefiniteLength(7));
}

#[test]
fn floats() {
    assert_eq!(
        decode(&hex!("fb0000000000000000")).unwrap(),
        Value::Float(0.0)
    );
    assert_eq!(
        decode(&hex!("fb3ff0000000000000")).unwrap(),
        Value::Float(1.0)
    );

    assert_eq!(kind(&hex!("fb7ff8000000000000")), ErrorKind::NaN);
    assert_eq!(kind(&hex!("fb7ff0000000000001")), ErrorKind::NaN);
    assert_eq!(kind(&hex!("fb7ff0000000000000")), ErrorKind::Infinite);
    assert_eq!(kind(&hex!("fbfff0000000000000")), ErrorKind::Infinite);

    // Only 64-bit floats are canonical
    assert_eq!(kind(&hex!("f93c00")), ErrorKind::ShortFloat(16));
    assert_eq!(kind(&hex!("fa47c35000")), ErrorKind::ShortFloat(32));
}

#[test]
fn simple_values() {
    assert_eq!(kind(&hex!("f7")), ErrorKind::UnsupportedSimpleValue(23));
    assert_eq!(kind(&hex!("f0")), ErrorKind::UnsupportedSimpleValue(16));
    assert_eq!(kind(&hex!("f8ff")), ErrorKind::UnsupportedSimpleValue(24));
}

#[test]
fn tags() {
    assert_eq!(
        kind(&hex!("c074323031332d30332d32315432303a30343a30305a")),
        ErrorKind::UnsupportedTag(0)
    );
    assert_eq!(kind(&hex!("c11a514b67b0")), ErrorKind::UnsupportedTag(1));
    assert_eq!(kind(&hex!("d74401020304")), ErrorKind::UnsupportedTag(23));
    assert_eq!(
        kind(&hex!("d82076687474703a2f2f7777772e6578616d706c652e636f6d")),
        ErrorKind::UnsupportedTag(32)
    );
    // Tag 42 written with a non-minimal argument
    assert!(matches!(
        kind(&hex!("d9002a 45 00 01551200")),
        ErrorKind::NonMinimal { value: 42, .. }
    ));
}

#[test]
fn invalid_utf8() {
    assert_eq!(kind(&hex!("62c328")), ErrorKind::InvalidUtf8);
    assert_eq!(kind(&hex!("61ff")), ErrorKind::InvalidUtf8);
    // Byte strings are not checked
    assert_eq!(decode(&hex!("41ff")).unwrap(), Value::Bytes(vec![0xff]));
}

#[test]
fn map_key_order() {
    // "a" then "b": in order
    assert!(decode(&hex!("a2 6161 01 6162 02")).is_ok());
    // Shorter key first, even though "b" < "aa" is false byte-wise
    assert!(decode(&hex!("a2 6162 01 626161 02")).is_ok());

    // "bb" then "a": longer before shorter
    let err = decode(&hex!("a2 626262 01 6161 02")).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::MisorderedKey {
            key: "a".into(),
            previous: "bb".into()
        }
    );
    assert_eq!(err.offset, 5);
    assert_eq!(err.path, Path::from(vec![Segment::MapKey(1)]));

    // Same length, descending
    assert_eq!(
        kind(&hex!("a2 6162 01 6161 02")),
        ErrorKind::MisorderedKey {
            key: "a".into(),
            previous: "b".into()
        }
    );

    // Duplicate
    assert_eq!(
        kind(&hex!("a2 6161 01 6161 02")),
        ErrorKind::DuplicateKey("a".into())
    );
}

#[test]
fn map_key_type() {
    assert_eq!(kind(&hex!("a1 01 02")), ErrorKind::NonStringKey("integer"));
    assert_eq!(kind(&hex!("a1 4161 02")), ErrorKind::NonStringKey("byte string"));
    assert_eq!(kind(&hex!("a1 f6 02")), ErrorKind::NonStringKey("null"));

    // A container as a key is reported at the container's offset
    let err = decode(&hex!("a1 8101 02")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonStringKey("array"));
    assert_eq!(err.offset, 1);
}

#[test]
fn links() {
    let cid = Cid::create(Codec::DagCbor, b"abc");
    let mut data = hex!("d82a 5825 00").to_vec();
    data.extend(cid.to_bytes());

    assert_eq!(decode(&data).unwrap(), Value::Link(cid));

    // The empty CID is a legal link
    assert_eq!(
        decode(&hex!("d82a 45 00 01711200")).unwrap(),
        Value::Link(Cid::create_empty(Codec::DagCbor))
    );

    // Corrupt the multibase prefix
    data[4] = 0x01;
    assert_eq!(kind(&data), ErrorKind::InvalidLinkPrefix(0x01));

    // Content must be a byte string
    assert_eq!(kind(&hex!("d82a 6100")), ErrorKind::InvalidLinkType(3));
    assert_eq!(kind(&hex!("d82a 40")), ErrorKind::EmptyLink);

    // Well formed CBOR, malformed CID
    assert_eq!(
        kind(&hex!("d82a 45 00 02711200")),
        ErrorKind::InvalidLink(cid::Error::InvalidVersion(2))
    );
    assert_eq!(
        kind(&hex!("d82a 45 00 01701200")),
        ErrorKind::InvalidLink(cid::Error::InvalidCodec(0x70))
    );
    assert_eq!(
        kind(&hex!("d82a 45 00 01711300")),
        ErrorKind::InvalidLink(cid::Error::InvalidHashType(0x13))
    );
    assert_eq!(
        kind(&hex!("d82a 46 00 0171120000")),
        ErrorKind::InvalidLink(cid::Error::InvalidLength(6))
    );
    assert_eq!(
        kind(&hex!("d82a 44 00 017112")),
        ErrorKind::InvalidLink(cid::Error::InvalidLength(4))
    );
}

#[test]
fn truncation() {
    let mut doc = Map::new();
    doc.insert("text".into(), "hello".into());
    doc.insert("n".into(), Value::Integer(-300));
    doc.insert("f".into(), Value::Float(2.5));
    doc.insert("bytes".into(), Value::Bytes(vec![1, 2, 3]));
    doc.insert(
        "nested".into(),
        Value::Array(vec![
            Value::Null,
            Value::Link(Cid::create(Codec::Raw, b"x")),
            Value::Array(vec![Value::Bool(true)]),
        ]),
    );
    let data = encode(&doc).unwrap();
    assert_eq!(decode(&data).unwrap(), Value::Map(doc));

    for len in 1..data.len() {
        let err = decode(&data[..len]).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::NotEnoughData { .. }),
            "truncated to {len}: {err}"
        );
    }

    assert_eq!(kind(&[]), ErrorKind::Empty);
    assert_eq!(
        kind(&hex!("1b0000")),
        ErrorKind::NotEnoughData {
            needed: 8,
            available: 2
        }
    );
    assert_eq!(
        kind(&hex!("5bffffffffffffffff")),
        ErrorKind::NotEnoughData {
            needed: u64::MAX,
            available: 0
        }
    );
}

#[test]
fn huge_counts_do_not_preallocate() {
    assert!(matches!(
        kind(&hex!("9bffffffffffffffff 01")),
        ErrorKind::NotEnoughData { .. }
    ));
    assert!(matches!(
        kind(&hex!("bbffffffffffffffff 6161 01")),
        ErrorKind::NotEnoughData { .. }
    ));
}

#[test]
fn decode_first_returns_remainder() {
    let (value, rest) = decode_first(&hex!("01 a0 f6")).unwrap();
    assert_eq!(value, Value::Integer(1));
    assert_eq!(rest, hex!("a0 f6"));

    let (value, rest) = decode_first(&hex!("8201a0 f6")).unwrap();
    assert_eq!(value, Value::Array(vec![1.into(), Value::Map(Map::new())]));
    assert_eq!(rest, hex!("f6"));

    let err = decode(&hex!("8201a0 f6")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TrailingData(1));
    assert_eq!(err.offset, 3);
}

#[test]
fn error_reports_offset_and_path() {
    // {"a": [1, {"b": NaN}]}
    let data = hex!("a1 6161 82 01 a1 6162 fb7ff8000000000000");
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NaN);
    assert_eq!(err.offset, 8);
    assert_eq!(
        err.path,
        Path::from(vec![
            Segment::Key("a".into()),
            Segment::Index(1),
            Segment::Key("b".into()),
        ])
    );
    assert_eq!(data[err.offset], 0xfb);
    assert_eq!(
        err.to_string(),
        "Invalid DAG-CBOR at offset 8 ($.a[1].b): float is NaN"
    );
}

const DEPTH: usize = 100_000;

fn nested(prefix: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut data = prefix.to_vec();
    data.extend(std::iter::repeat_n(0x81, DEPTH));
    data.extend_from_slice(suffix);
    data
}

#[test]
fn deep_nesting_is_not_recursive() {
    let data = nested(&[], &hex!("01"));

    let value = decode(&data).unwrap();
    let mut depth = 0;
    let mut v = &value;
    while let Some([inner]) = v.as_array() {
        v = inner;
        depth += 1;
    }
    assert_eq!(depth, DEPTH);
    assert_eq!(*v, Value::Integer(1));

    // And the same depth truncated fails cleanly
    assert!(matches!(
        kind(&data[..DEPTH]),
        ErrorKind::NotEnoughData { .. }
    ));
}

#[test]
fn deep_value_then_trailing_data() {
    let data = nested(&[], &hex!("01 00"));
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TrailingData(1));
    assert_eq!(err.offset, DEPTH + 1);
}

#[test]
fn deep_value_then_bad_key() {
    // {"a": [[[...1]]], 0: ...}
    let data = nested(&hex!("a2 6161"), &hex!("01 00"));
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NonStringKey("integer"));
    assert_eq!(err.offset, DEPTH + 4);
    assert_eq!(err.path, Path::from(vec![Segment::MapKey(1)]));
}

#[test]
fn deep_value_inside_failed_container() {
    // [[[...1]]] as the first of two elements, then a NaN
    let mut data = nested(&hex!("82"), &hex!("01"));
    data.extend(hex!("fb7ff8000000000000"));
    let err = decode(&data).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NaN);
    assert_eq!(err.path, Path::from(vec![Segment::Index(1)]));
}

#[test]
fn round_trip() {
    let mut inner = Map::new();
    inner.insert("".into(), Value::Null);
    inner.insert("link".into(), Cid::create_empty(Codec::Raw).into());
    inner.insert("\u{00fc}ber".into(), Value::Float(-0.5));

    let mut doc = Map::new();
    doc.insert("min".into(), Value::Integer(-18446744073709551616));
    doc.insert("max".into(), Value::Integer(18446744073709551615));
    doc.insert("zero".into(), Value::Integer(0));
    doc.insert("pi".into(), Value::Float(std::f64::consts::PI));
    doc.insert("tiny".into(), Value::Float(f64::MIN_POSITIVE));
    doc.insert("yes".into(), Value::Bool(true));
    doc.insert("no".into(), Value::Bool(false));
    doc.insert("blob".into(), Value::Bytes((0..=255).collect()));
    doc.insert("text".into(), "x".repeat(70000).into());
    doc.insert(
        "list".into(),
        Value::Array(vec![
            Value::Map(inner.clone()),
            Value::Array(Vec::new()),
            Value::Map(Map::new()),
        ]),
    );
    doc.insert("inner".into(), Value::Map(inner));
    doc.insert(
        "cid".into(),
        Cid::create(Codec::DagCbor, b"some other record").into(),
    );

    let data = encode(&doc).unwrap();
    assert_eq!(decode(&data).unwrap(), Value::Map(doc));

    // Canonical: re-encoding the decoded value reproduces the input exactly
    let decoded = decode(&data).unwrap().into_map().unwrap();
    assert_eq!(encode(&decoded).unwrap(), data);

    for value in [
        Value::Null,
        Value::Integer(-24),
        Value::Float(1.0e-300),
        Value::from("scalar root"),
    ] {
        assert_eq!(decode(&encode_value(&value).unwrap()).unwrap(), value);
    }
}
