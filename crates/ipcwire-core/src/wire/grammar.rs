//! Signature grammar: lengths of complete type expressions.
//!
//! All offsets reported in errors are byte positions inside the signature
//! being measured.

use super::error::WireError;
use super::layout;
use super::types::SigType;

/// Length of exactly one complete type at the start of `sig`.
///
/// `last_was_array` is set when the type is an array element; it is the only
/// position where a `{…}` dict-entry may appear.
///
/// # Examples
/// ```
/// use ipcwire_core::wire::grammar::one_type_length;
///
/// assert_eq!(one_type_length(b"a{sv}i", false).unwrap(), 5);
/// assert_eq!(one_type_length(b"(yi)d", false).unwrap(), 4);
/// assert!(one_type_length(b"{sv}", false).is_err());
/// ```
///
/// # Errors
/// `Empty` for an empty signature, `BadFormat` for any grammar violation.
pub fn one_type_length(sig: &[u8], last_was_array: bool) -> Result<usize, WireError> {
    type_len_at(sig, 0, last_was_array, 0)
}

/// Total length of a signature made of complete types only.
///
/// An empty signature is well formed (length 0): it describes an empty body.
/// A struct without its closing `)` is `BadFormat`, never accepted.
///
/// # Examples
/// ```
/// use ipcwire_core::wire::grammar::sig_is_well_formed;
///
/// assert_eq!(sig_is_well_formed(b"sa{sv}").unwrap(), 6);
/// assert!(sig_is_well_formed(b"i)").is_err());
/// ```
pub fn sig_is_well_formed(sig: &[u8]) -> Result<usize, WireError> {
    if sig.len() > layout::MAX_SIGNATURE_LEN {
        return Err(WireError::bad_format(
            layout::MAX_SIGNATURE_LEN,
            "signature longer than 255 bytes",
        ));
    }
    let len = sequence_len_at(sig, 0, false, 0)?;
    debug_assert_eq!(len, sig.len());
    Ok(len)
}

/// Length of a run of complete types starting at `start`.
///
/// Inside a struct the run ends, without consuming it, at the first `)`.
fn sequence_len_at(
    sig: &[u8],
    start: usize,
    in_struct: bool,
    depth: usize,
) -> Result<usize, WireError> {
    let mut pos = start;
    while let Some(&code) = sig.get(pos) {
        if in_struct && code == layout::STRUCT_CLOSE {
            break;
        }
        pos += type_len_at(sig, pos, false, depth)?;
    }
    Ok(pos - start)
}

fn type_len_at(
    sig: &[u8],
    pos: usize,
    last_was_array: bool,
    depth: usize,
) -> Result<usize, WireError> {
    let code = *sig.get(pos).ok_or(WireError::Empty)?;
    if depth >= layout::MAX_DEPTH {
        return Err(WireError::bad_format(pos, "signature nested too deeply"));
    }

    match code {
        layout::STRUCT_OPEN => struct_len_at(sig, pos, depth),
        layout::DICT_OPEN => dict_entry_len_at(sig, pos, last_was_array, depth),
        _ => match SigType::from_code(code) {
            Some(SigType::Array) => {
                let element = type_len_at(sig, pos + 1, true, depth + 1)
                    .map_err(|err| err.empty_as_bad_format(pos, "array without element type"))?;
                Ok(1 + element)
            }
            Some(SigType::Struct | SigType::DictEntry) => Err(WireError::bad_format(
                pos,
                "struct and dict-entry codes are not valid in signatures",
            )),
            Some(_) => Ok(1),
            None => Err(WireError::bad_format(pos, "unknown type code")),
        },
    }
}

fn struct_len_at(sig: &[u8], pos: usize, depth: usize) -> Result<usize, WireError> {
    let inner = sequence_len_at(sig, pos + 1, true, depth + 1)?;
    if inner == 0 {
        return Err(WireError::bad_format(pos, "empty struct"));
    }
    let close = pos + 1 + inner;
    match sig.get(close) {
        Some(&layout::STRUCT_CLOSE) => Ok(inner + 2),
        _ => Err(WireError::bad_format(close, "struct is missing its closing ')'")),
    }
}

fn dict_entry_len_at(
    sig: &[u8],
    pos: usize,
    last_was_array: bool,
    depth: usize,
) -> Result<usize, WireError> {
    if !last_was_array {
        return Err(WireError::bad_format(pos, "dict entry outside of an array"));
    }
    if sig.len() - pos < layout::MIN_DICT_ENTRY_LEN {
        return Err(WireError::bad_format(pos, "truncated dict entry"));
    }

    let key_pos = pos + 1;
    let key_len = type_len_at(sig, key_pos, false, depth + 1)?;
    let key_is_basic = SigType::from_code(sig[key_pos]).is_some_and(SigType::is_basic);
    if key_len != 1 || !key_is_basic {
        return Err(WireError::bad_format(
            key_pos,
            "dict entry key must be a basic type",
        ));
    }

    let value_pos = key_pos + 1;
    let value_len = type_len_at(sig, value_pos, false, depth + 1)
        .map_err(|err| err.empty_as_bad_format(value_pos, "dict entry without value type"))?;

    let close = value_pos + value_len;
    match sig.get(close) {
        Some(&layout::DICT_CLOSE) => Ok(value_len + 3),
        _ => Err(WireError::bad_format(
            close,
            "dict entry must hold exactly one key and one value",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::{one_type_length, sig_is_well_formed};
    use crate::wire::error::{ErrorKind, WireError};

    #[test]
    fn basic_codes_are_one_byte() {
        for code in b"bdfghinoqstuvxy" {
            assert_eq!(one_type_length(&[*code, b'i'], false).unwrap(), 1);
        }
    }

    #[test]
    fn nested_compositions_measure_their_own_length() {
        let cases: [&[u8]; 8] = [
            b"ai",
            b"aai",
            b"(i)",
            b"(ia(sv))",
            b"a{sv}",
            b"a{s(iv)}",
            b"a{ua{sv}}",
            b"((y)(n(q)))",
        ];
        for sig in cases {
            assert_eq!(one_type_length(sig, false).unwrap(), sig.len(), "{sig:?}");
            assert_eq!(sig_is_well_formed(sig).unwrap(), sig.len(), "{sig:?}");
        }
    }

    #[test]
    fn sequence_length_covers_every_type() {
        assert_eq!(sig_is_well_formed(b"sa{sv}(ii)ayv").unwrap(), 13);
        assert_eq!(sig_is_well_formed(b"").unwrap(), 0);
    }

    #[test]
    fn empty_signature_is_reported() {
        assert_eq!(one_type_length(b"", false), Err(WireError::Empty));
    }

    #[test]
    fn dict_entry_outside_array_is_rejected() {
        let err = one_type_length(b"{sv}", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);
        assert!(sig_is_well_formed(b"({sv})").is_err());
        assert!(sig_is_well_formed(b"{sv}").is_err());
    }

    #[test]
    fn dict_entry_key_must_be_basic() {
        for sig in [&b"a{(i)v}"[..], b"a{aiv}", b"a{vs}"] {
            let err = sig_is_well_formed(sig).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadFormat, "{sig:?}");
        }
    }

    #[test]
    fn dict_entry_needs_exactly_two_members() {
        assert!(sig_is_well_formed(b"a{s}").is_err());
        assert!(sig_is_well_formed(b"a{sii}").is_err());
        assert!(sig_is_well_formed(b"a{si").is_err());
    }

    #[test]
    fn unknown_and_reserved_codes_are_rejected() {
        for sig in [&b"z"[..], b"r", b"e", b"ae", b"i)", b")"] {
            let err = sig_is_well_formed(sig).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadFormat, "{sig:?}");
        }
    }

    #[test]
    fn array_without_element_is_bad_format() {
        assert_eq!(
            one_type_length(b"a", false),
            Err(WireError::BadFormat {
                offset: 0,
                reason: "array without element type"
            })
        );
    }

    #[test]
    fn struct_needs_members_and_closing_paren() {
        assert!(sig_is_well_formed(b"()").is_err());
        let err = sig_is_well_formed(b"(ii").unwrap_err();
        assert_eq!(
            err,
            WireError::BadFormat {
                offset: 3,
                reason: "struct is missing its closing ')'"
            }
        );
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let mut deep = vec![b'a'; 80];
        deep.push(b'i');
        let err = sig_is_well_formed(&deep).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);

        let mut shallow = vec![b'a'; 32];
        shallow.push(b'i');
        assert_eq!(sig_is_well_formed(&shallow).unwrap(), 33);
    }

    #[test]
    fn overlong_signature_is_rejected() {
        let sig = vec![b'y'; 256];
        assert!(sig_is_well_formed(&sig).is_err());
        assert_eq!(sig_is_well_formed(&sig[..255]).unwrap(), 255);
    }
}
