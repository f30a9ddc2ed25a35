//! Fixed-width and string readers for basic kinds.
//!
//! Multi-byte scalars are read little-endian, the only byte order accepted on
//! the wire.

use super::cursor::{Cursor, align_up};
use super::error::WireError;
use super::grammar;
use super::layout;
use super::types::SigType;
use super::value::Basic;

/// Decode one basic value: eat its type code, align, read.
///
/// The signature head is consumed whatever it is; callers have already
/// matched it to `kind`.
///
/// # Errors
/// `BadFormat` on bad padding, short buffers, bad strings and non-0/1
/// booleans. `kind` must be basic.
pub fn decode_basic<'a>(
    cursor: Cursor<'a>,
    kind: SigType,
) -> Result<(Cursor<'a>, Basic<'a>), WireError> {
    let cursor = align_up(cursor.eat_code(), kind.alignment())?;
    read_basic(cursor, kind)
}

fn read_basic<'a>(cursor: Cursor<'a>, kind: SigType) -> Result<(Cursor<'a>, Basic<'a>), WireError> {
    let decoded = match kind {
        SigType::Byte => {
            let (next, [value]) = cursor.take_array::<1>()?;
            (next, Basic::Byte(value))
        }
        SigType::Boolean => {
            let (next, raw) = read_u32(cursor)?;
            let value = match raw {
                0 => false,
                1 => true,
                _ => return Err(cursor.bad_format("boolean is neither 0 nor 1")),
            };
            (next, Basic::Boolean(value))
        }
        SigType::Int16 => {
            let (next, bytes) = cursor.take_array::<2>()?;
            (next, Basic::Int16(i16::from_le_bytes(bytes)))
        }
        SigType::UInt16 => {
            let (next, bytes) = cursor.take_array::<2>()?;
            (next, Basic::UInt16(u16::from_le_bytes(bytes)))
        }
        SigType::Int32 => {
            let (next, bytes) = cursor.take_array::<4>()?;
            (next, Basic::Int32(i32::from_le_bytes(bytes)))
        }
        SigType::UInt32 => {
            let (next, value) = read_u32(cursor)?;
            (next, Basic::UInt32(value))
        }
        SigType::Token => {
            let (next, value) = read_u32(cursor)?;
            (next, Basic::Token(value))
        }
        SigType::Float => {
            let (next, bytes) = cursor.take_array::<4>()?;
            (next, Basic::Float(f32::from_le_bytes(bytes)))
        }
        SigType::Int64 => {
            let (next, bytes) = cursor.take_array::<8>()?;
            (next, Basic::Int64(i64::from_le_bytes(bytes)))
        }
        SigType::UInt64 => {
            let (next, bytes) = cursor.take_array::<8>()?;
            (next, Basic::UInt64(u64::from_le_bytes(bytes)))
        }
        SigType::Double => {
            let (next, bytes) = cursor.take_array::<8>()?;
            (next, Basic::Double(f64::from_le_bytes(bytes)))
        }
        SigType::String => {
            let (next, text) = read_string(cursor)?;
            (next, Basic::Str(text))
        }
        SigType::ObjectPath => {
            let (next, text) = read_string(cursor)?;
            (next, Basic::ObjectPath(text))
        }
        SigType::Signature => {
            let (next, text) = read_signature(cursor)?;
            (next, Basic::Signature(text))
        }
        SigType::Array | SigType::Struct | SigType::DictEntry | SigType::Variant => {
            return Err(cursor.bad_format("container type where a basic type is required"));
        }
    };
    Ok(decoded)
}

pub(crate) fn read_u32(cursor: Cursor<'_>) -> Result<(Cursor<'_>, u32), WireError> {
    let (next, bytes) = cursor.take_array::<4>()?;
    Ok((next, u32::from_le_bytes(bytes)))
}

/// STRZ / OBJPATH body: 4-byte length, text, NUL.
fn read_string(cursor: Cursor<'_>) -> Result<(Cursor<'_>, &str), WireError> {
    let (after_prefix, len) = read_u32(cursor)?;
    read_terminated(after_prefix, len as usize)
}

/// SIG body: 1-byte length, signature text, NUL.
fn read_signature(cursor: Cursor<'_>) -> Result<(Cursor<'_>, &str), WireError> {
    let (after_prefix, [len]) = cursor.take_array::<1>()?;
    let (next, text) = read_terminated(after_prefix, len as usize)?;
    grammar::sig_is_well_formed(text.as_bytes()).map_err(|err| match err {
        WireError::BadFormat { offset, reason } => {
            WireError::bad_format(after_prefix.offset() + offset, reason)
        }
        other => other,
    })?;
    Ok((next, text))
}

/// Read `len` text bytes followed by exactly one NUL.
fn read_terminated(cursor: Cursor<'_>, len: usize) -> Result<(Cursor<'_>, &str), WireError> {
    let total = len
        .checked_add(1)
        .ok_or_else(|| cursor.bad_format("string length overflows"))?;
    let (next, bytes) = cursor.take(total)?;
    let (text, terminator) = bytes.split_at(len);
    if terminator != [layout::NUL] {
        return Err(WireError::bad_format(
            cursor.offset() + len,
            "string is not NUL-terminated at its declared length",
        ));
    }
    if let Some(pos) = text.iter().position(|&b| b == layout::NUL) {
        return Err(WireError::bad_format(
            cursor.offset() + pos,
            "embedded NUL before declared string length",
        ));
    }
    let text = std::str::from_utf8(text)
        .map_err(|_| cursor.bad_format("string is not valid UTF-8"))?;
    Ok((next, text))
}
