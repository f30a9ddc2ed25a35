//! Array, struct, dict-entry and variant decoders.
//!
//! Each decoder takes a cursor whose signature starts with its own type and
//! returns the cursor positioned after the value, in both signature and data.

use super::cursor::{Cursor, align_up};
use super::error::WireError;
use super::grammar;
use super::layout;
use super::primitive::{decode_basic, read_u32};
use super::types::{SigType, leading_alignment};
use super::validator::{Mode, validate};
use super::value::{Array, DictEntry, Struct, Value, Variant};

/// Decode exactly one complete type from the head of the cursor's signature.
///
/// `part_of_array` allows a dict-entry at this position.
///
/// # Errors
/// `Empty` if the signature is exhausted, otherwise the first decode failure.
pub fn decode_single<'a>(
    cursor: Cursor<'a>,
    part_of_array: bool,
) -> Result<(Cursor<'a>, Value<'a>), WireError> {
    let code = cursor.peek_code().ok_or(WireError::Empty)?;
    match code {
        layout::STRUCT_OPEN => {
            decode_struct(cursor).map(|(next, value)| (next, Value::Struct(value)))
        }
        layout::DICT_OPEN if part_of_array => {
            decode_dict_entry(cursor).map(|(next, value)| (next, Value::DictEntry(value)))
        }
        layout::DICT_OPEN => Err(cursor.bad_format("dict entry outside of an array")),
        _ => match SigType::from_code(code) {
            Some(SigType::Array) => {
                decode_array(cursor).map(|(next, value)| (next, Value::Array(value)))
            }
            Some(SigType::Variant) => {
                decode_variant(cursor).map(|(next, value)| (next, Value::Variant(value)))
            }
            Some(kind) if kind.is_basic() => {
                decode_basic(cursor, kind).map(|(next, value)| (next, Value::Basic(value)))
            }
            Some(_) => Err(cursor.bad_format(
                "struct and dict-entry codes are not valid in signatures",
            )),
            None => Err(cursor.bad_format("unknown type code")),
        },
    }
}

/// `a<T>`: aligned UINT32 byte count, then whole elements filling it exactly.
pub(crate) fn decode_array(cursor: Cursor<'_>) -> Result<(Cursor<'_>, Array<'_>), WireError> {
    let sig = cursor.signature();
    let element_len = grammar::one_type_length(sig.get(1..).unwrap_or_default(), true)
        .map_err(|err| err.empty_as_bad_format(cursor.offset(), "array without element type"))?;
    let element = &sig[1..1 + element_len];
    let rest = &sig[1 + element_len..];

    let cursor = align_up(cursor, SigType::Array.alignment())?;
    let (after_len, byte_count) = read_u32(cursor)?;
    if byte_count > layout::MAX_ARRAY_LEN {
        return Err(cursor.bad_format("array longer than 64 MiB"));
    }

    if byte_count == 0 {
        let body = after_len.split(0)?.0.with_signature(element);
        let array = Array {
            element,
            count: 0,
            body,
        };
        return Ok((after_len.with_signature(rest), array));
    }

    let element_align = leading_alignment(element).unwrap_or(1);
    let first = align_up(after_len, element_align)?;
    let (body, after) = first.split(byte_count as usize)?;
    let body = body.with_signature(element).nested()?;

    let mut walk = body;
    let mut count = 0usize;
    while walk.remaining() > 0 {
        let (next, _) = decode_single(walk.with_signature(element), true)?;
        walk = next;
        count += 1;
    }

    let array = Array {
        element,
        count,
        body,
    };
    Ok((after.with_signature(rest), array))
}

/// `(…)`: 8-aligned members in signature order.
pub(crate) fn decode_struct(cursor: Cursor<'_>) -> Result<(Cursor<'_>, Struct<'_>), WireError> {
    let sig = cursor.signature();
    let struct_len = grammar::one_type_length(sig, false)?;
    let cursor = align_up(cursor, layout::CONTAINER_ALIGN)?;

    let members = cursor.eat_code().nested()?;
    let end = validate(
        members,
        Mode {
            in_struct: true,
            ..Mode::default()
        },
    )?;

    let fields = members.with_signature(&sig[1..struct_len - 1]);
    let next = end.with_signature(&sig[struct_len..]).at_depth_of(&cursor);
    Ok((next, Struct { fields }))
}

/// `{kv}`: 8-aligned basic key, one value, closing brace.
pub(crate) fn decode_dict_entry(cursor: Cursor<'_>) -> Result<(Cursor<'_>, DictEntry<'_>), WireError> {
    let sig = cursor.signature();
    let entry_len = grammar::one_type_length(sig, true)?;
    let cursor = align_up(cursor, layout::CONTAINER_ALIGN)?;

    let key_cursor = cursor.eat_code().nested()?;
    let key_kind = key_cursor
        .peek_code()
        .and_then(SigType::from_code)
        .filter(|kind| kind.is_basic())
        .ok_or_else(|| key_cursor.bad_format("dict entry key must be a basic type"))?;
    let (value_cursor, key) = decode_basic(key_cursor, key_kind)?;

    let (after_value, _) = decode_single(value_cursor, false)?;
    if after_value.peek_code() != Some(layout::DICT_CLOSE) {
        return Err(after_value.bad_format("dict entry must hold exactly one key and one value"));
    }

    let value = value_cursor.with_signature(&sig[2..entry_len - 1]);
    let next = after_value.eat_code().at_depth_of(&cursor);
    Ok((next, DictEntry { key, value }))
}

/// `v`: a SIG describing exactly one complete type, then that value.
pub(crate) fn decode_variant(cursor: Cursor<'_>) -> Result<(Cursor<'_>, Variant<'_>), WireError> {
    let rest = cursor.signature().get(1..).unwrap_or_default();
    let (after_sig, inner) = decode_basic(cursor, SigType::Signature)?;
    let signature = inner.as_str().unwrap_or_default();

    let single_len = grammar::one_type_length(signature.as_bytes(), false)
        .map_err(|err| err.empty_as_bad_format(cursor.offset(), "variant with empty signature"))?;
    if single_len != signature.len() {
        return Err(cursor.bad_format("variant signature must hold exactly one complete type"));
    }

    let body = after_sig.with_signature(signature.as_bytes()).nested()?;
    let end = validate(
        body,
        Mode {
            single_only: true,
            ..Mode::default()
        },
    )?;

    let next = end.with_signature(rest).at_depth_of(&cursor);
    Ok((next, Variant { signature, body }))
}
