//! Signature grammar and value codec.
//!
//! The codec is layered leaf-first:
//! - `types`: the type-code table (kind, alignment, name)
//! - `grammar`: length of complete type expressions in a signature
//! - `cursor`: borrowed parse position and the zero-padding alignment gate
//! - `primitive`: fixed-width and string readers for basic kinds
//! - `container`: array, struct, dict-entry and variant decoders
//! - `validator`: the recursive walk over a signature and its data
//! - `value`: borrowed basic values and lazy container views
//!
//! Decoding is synchronous, allocation-free and never copies payload bytes.
//! Every value handed back borrows from the caller's buffer.

pub mod container;
pub mod cursor;
pub mod error;
pub mod grammar;
pub mod layout;
pub mod primitive;
pub mod types;
pub mod validator;
pub mod value;

use cursor::Cursor;
use error::WireError;
use validator::{Mode, validate};
use value::Values;

/// Validate a whole body against a caller-supplied signature.
///
/// The data must be consumed exactly; trailing bytes are a format error.
/// On success the returned iterator walks the already-validated values.
///
/// # Examples
/// ```
/// use ipcwire_core::{Basic, decode};
///
/// let body = [5u8, 0, 0, 0, b'h', b'e', b'l', b'l', b'o', 0];
/// let mut values = decode("s", &body).unwrap();
/// let first = values.next().unwrap().unwrap();
/// assert_eq!(first.as_basic(), Some(Basic::Str("hello")));
/// ```
///
/// # Errors
/// `BadArgument` when `signature` itself is malformed; otherwise the first
/// decode failure.
pub fn decode<'a>(signature: &'a str, data: &'a [u8]) -> Result<Values<'a>, WireError> {
    grammar::sig_is_well_formed(signature.as_bytes()).map_err(|_| WireError::BadArgument {
        reason: "signature is not well formed",
    })?;
    decode_body(signature.as_bytes(), data)
}

/// Like [`decode`] for signatures that came off the wire and were already
/// grammar-checked by the SIG reader.
pub(crate) fn decode_body<'a>(signature: &'a [u8], data: &'a [u8]) -> Result<Values<'a>, WireError> {
    let start = Cursor::new(signature, data);
    let end = validate(start, Mode::default())?;
    if end.remaining() != 0 {
        return Err(end.bad_format("trailing bytes after last value"));
    }
    Ok(Values::new(start))
}
