use super::container::decode_single;
use super::cursor::Cursor;
use super::error::WireError;
use super::layout;

/// How far a validation walk goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mode {
    /// Stop at, and consume, the `)` closing the current struct.
    pub in_struct: bool,
    /// Stop after one complete type.
    pub single_only: bool,
    /// Dict-entries are allowed at this level.
    pub part_of_array: bool,
}

/// Walk the cursor's signature and data together, one complete type at a time.
///
/// Returns the cursor after the last validated value. Stops when the
/// signature is exhausted, at the closing `)` in struct mode, or after one
/// type in single mode.
///
/// # Examples
/// ```
/// use ipcwire_core::wire::cursor::Cursor;
/// use ipcwire_core::wire::validator::{Mode, validate};
///
/// let data = [5u8, 0, 0, 0, 7, 0, 0, 0];
/// let end = validate(Cursor::new(b"yu", &data), Mode::default()).unwrap();
/// assert_eq!(end.offset(), 8);
/// ```
///
/// # Errors
/// The first failure aborts the walk and is returned unchanged.
pub fn validate<'a>(cursor: Cursor<'a>, mode: Mode) -> Result<Cursor<'a>, WireError> {
    let mut cursor = cursor;
    loop {
        match cursor.peek_code() {
            None if mode.in_struct => {
                return Err(cursor.bad_format("struct is missing its closing ')'"));
            }
            None => return Ok(cursor),
            Some(layout::STRUCT_CLOSE) if mode.in_struct => return Ok(cursor.eat_code()),
            Some(_) => {}
        }

        let (next, _) = decode_single(cursor, mode.part_of_array)?;
        cursor = next;
        if mode.single_only {
            return Ok(cursor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Mode, validate};
    use crate::wire::cursor::Cursor;
    use crate::wire::error::{ErrorKind, WireError};

    #[test]
    fn empty_signature_consumes_nothing() {
        let data = [1u8, 2, 3];
        let end = validate(Cursor::new(b"", &data), Mode::default()).unwrap();
        assert_eq!(end.offset(), 0);
    }

    #[test]
    fn single_mode_stops_after_one_type() {
        let data = [1u8, 0, 2, 0];
        let mode = Mode {
            single_only: true,
            ..Mode::default()
        };
        let end = validate(Cursor::new(b"qq", &data), mode).unwrap();
        assert_eq!(end.offset(), 2);
        assert_eq!(end.signature(), b"q");
    }

    #[test]
    fn struct_mode_consumes_closing_paren() {
        let data = [1u8, 2];
        let mode = Mode {
            in_struct: true,
            ..Mode::default()
        };
        let end = validate(Cursor::new(b"yy)q", &data), mode).unwrap();
        assert_eq!(end.signature(), b"q");
        assert_eq!(end.offset(), 2);
    }

    #[test]
    fn struct_mode_requires_closing_paren() {
        let mode = Mode {
            in_struct: true,
            ..Mode::default()
        };
        let err = validate(Cursor::new(b"y", &[1]), mode).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);
    }

    #[test]
    fn misaligned_scalar_padding_is_checked() {
        // y then u: three bytes of zero padding before the u32
        let good = [1u8, 0, 0, 0, 9, 0, 0, 0];
        assert!(validate(Cursor::new(b"yu", &good), Mode::default()).is_ok());

        let bad = [1u8, 0, 7, 0, 9, 0, 0, 0];
        assert_eq!(
            validate(Cursor::new(b"yu", &bad), Mode::default()).unwrap_err(),
            WireError::BadFormat {
                offset: 2,
                reason: "non-zero padding byte"
            }
        );
    }

    #[test]
    fn dict_entry_needs_array_context() {
        let data = [0u8; 16];
        let mode = Mode {
            part_of_array: true,
            single_only: true,
            ..Mode::default()
        };
        let end = validate(Cursor::new(b"{yy}", &data), mode).unwrap();
        assert_eq!(end.offset(), 2);
        assert!(validate(Cursor::new(b"{yy}", &data), Mode::default()).is_err());
    }

    #[test]
    fn unknown_code_fails() {
        let err = validate(Cursor::new(b"k", &[0]), Mode::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadFormat);
    }
}
