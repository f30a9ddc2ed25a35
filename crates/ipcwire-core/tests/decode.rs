use ipcwire_core::{
    AlignedBuf, Basic, ErrorKind, NameKind, SigType, Value, WireError, decode, eat_header,
    sig_is_well_formed,
};

fn le32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Encoded size of a zero value of a basic kind.
fn zero_value_len(kind: SigType) -> usize {
    match kind {
        SigType::String | SigType::ObjectPath => 5,
        SigType::Signature => 2,
        other => other.alignment(),
    }
}

#[test]
fn composed_signatures_are_well_formed() {
    for sig in [
        "y", "ai", "aai", "(ii)", "a(sv)", "a{sv}", "a{s(iav)}", "(y(qa{ys}))ad", "sa{sv}as",
    ] {
        assert_eq!(sig_is_well_formed(sig.as_bytes()), Ok(sig.len()), "{sig}");
    }
}

#[test]
fn dict_entry_outside_array_and_unknown_codes_fail() {
    for sig in ["{sv}", "({sv})", "k", "a", "(i", "i)", "a{vs}"] {
        let err = sig_is_well_formed(sig.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat, "{sig}");
    }
}

#[test]
fn every_basic_kind_checks_its_padding() {
    let basics = SigType::ALL.into_iter().filter(|kind| kind.is_basic());
    for kind in basics {
        let sig = format!("y{}", kind.code() as char);
        let pad = (kind.alignment() - 1) % kind.alignment();
        let mut data = vec![7u8];
        data.resize(1 + pad + zero_value_len(kind), 0);

        assert!(decode(&sig, &data).is_ok(), "{sig} with zero padding");

        if pad > 0 {
            data[1] = 1;
            let err = decode(&sig, &data).unwrap_err();
            assert_eq!(
                err,
                WireError::BadFormat {
                    offset: 1,
                    reason: "non-zero padding byte"
                },
                "{sig}"
            );
        }
    }
}

#[test]
fn int32_array_counts_and_consumes() {
    let mut data = Vec::new();
    data.extend_from_slice(&le32(8));
    data.extend_from_slice(&le32(1));
    data.extend_from_slice(&le32(2));
    assert_eq!(data.len(), 12);

    let value = decode("ai", &data).unwrap().next().unwrap().unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);
    assert_eq!(array.bytes().len(), 8);
}

#[test]
fn partial_trailing_element_fails() {
    let mut data = Vec::new();
    data.extend_from_slice(&le32(5));
    data.extend_from_slice(&le32(1));
    data.push(0);
    assert_eq!(decode("ai", &data).unwrap_err().kind(), ErrorKind::BadFormat);
}

#[test]
fn string_decodes_in_place() {
    let data = b"\x05\x00\x00\x00hello\x00";
    let value = decode("s", data).unwrap().next().unwrap().unwrap();
    let Some(Basic::Str(text)) = value.as_basic() else {
        panic!("expected string");
    };
    assert_eq!(text, "hello");
    assert_eq!(text.as_ptr(), data[4..].as_ptr());
}

#[test]
fn string_length_must_match_terminator() {
    assert_eq!(
        decode("s", b"\x05\x00\x00\x00hel\x00o\x00").unwrap_err().kind(),
        ErrorKind::BadFormat
    );
    assert_eq!(
        decode("s", b"\x04\x00\x00\x00hello\x00").unwrap_err().kind(),
        ErrorKind::BadFormat
    );
}

#[test]
fn variant_unwraps_to_inner_value() {
    let data = [1u8, b'u', 0, 0, 42, 0, 0, 0];
    let value = decode("v", &data).unwrap().next().unwrap().unwrap();
    let variant = value.as_variant().unwrap();
    assert_eq!(variant.signature(), "u");
    assert_eq!(variant.value().unwrap().as_basic(), Some(Basic::UInt32(42)));
}

#[test]
fn variant_with_two_types_fails() {
    let data = [2u8, b'u', b'u', 0, 42, 0, 0, 0, 1, 0, 0, 0];
    assert_eq!(decode("v", &data).unwrap_err().kind(), ErrorKind::BadFormat);
}

#[test]
fn dictionary_entry_scenario() {
    let mut data = Vec::new();
    data.extend_from_slice(&le32(16));
    data.extend_from_slice(&[0u8; 4]);
    data.extend_from_slice(&le32(1));
    data.extend_from_slice(b"k\x00");
    data.extend_from_slice(&[1, b'u', 0, 0, 0, 0]);
    data.extend_from_slice(&le32(7));

    let value = decode("a{sv}", &data).unwrap().next().unwrap().unwrap();
    let entries: Vec<Value<'_>> = value
        .as_array()
        .unwrap()
        .iter()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(entries.len(), 1);

    let Value::DictEntry(entry) = entries[0] else {
        panic!("expected dict entry");
    };
    assert_eq!(entry.key(), Basic::Str("k"));
    let inner = entry.value().unwrap().as_variant().unwrap().value().unwrap();
    assert_eq!(inner.as_basic(), Some(Basic::UInt32(7)));
}

#[test]
fn container_dictionary_keys_fail() {
    let data = [0u8; 4];
    for sig in ["a{(i)v}", "a{aiv}"] {
        let err = decode(sig, &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadArgument, "{sig}");
        let err = sig_is_well_formed(sig.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat, "{sig}");
    }
}

#[test]
fn container_dictionary_keys_inside_variant_fail() {
    // variant whose own signature carries a struct or array key
    for sig in ["a{(i)v}", "a{aiv}"] {
        let mut data = vec![sig.len() as u8];
        data.extend_from_slice(sig.as_bytes());
        data.push(0);
        data.resize(16, 0);
        let err = decode("v", &data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat, "{sig}");
    }
}

#[test]
fn name_syntax_scenarios() {
    assert!(NameKind::ObjectPath.is_valid("/"));
    assert!(!NameKind::ObjectPath.is_valid("/a//b"));
    assert!(NameKind::Interface.is_valid("a.B"));
    assert!(!NameKind::Interface.is_valid("a"));
    assert!(NameKind::Bus.is_valid(":1.a"));
    assert!(!NameKind::Bus.is_valid("1.a"));
}

fn minimal_header(endian: u8) -> AlignedBuf {
    let mut bytes = vec![endian, 2, 0, 1];
    bytes.extend_from_slice(&le32(0));
    bytes.extend_from_slice(&le32(1));
    bytes.extend_from_slice(&le32(0));
    AlignedBuf::from_bytes(&bytes)
}

#[test]
fn minimal_header_scenario() {
    let buf = minimal_header(b'l');
    let mut stream = buf.as_slice();
    let (header, consumed) = eat_header(&mut stream).unwrap();
    assert_eq!(consumed, 12 + 4);
    assert!(stream.is_empty());
    assert_eq!(header.path, None);
    assert_eq!(header.interface, None);
    assert_eq!(header.member, None);
    assert_eq!(header.error_name, None);
    assert_eq!(header.reply_serial, None);
    assert_eq!(header.destination, None);
    assert_eq!(header.sender, None);
    assert_eq!(header.signature, None);
}

#[test]
fn big_endian_header_is_not_supported() {
    let buf = minimal_header(b'B');
    let err = eat_header(&mut buf.as_slice()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSupported);
}
