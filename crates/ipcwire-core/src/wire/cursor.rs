use super::error::WireError;
use super::layout;

/// Parse position: the remaining signature plus the remaining data.
///
/// A cursor never owns bytes; it borrows sub-ranges of the caller's buffer and
/// is threaded by value. Every decode step takes a cursor and hands back a new
/// one, so a failed step leaves the caller's cursor untouched.
///
/// `offset` is the position of `data[0]` relative to the start of the message
/// (or body); alignment is always computed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    sig: &'a [u8],
    data: &'a [u8],
    offset: usize,
    depth: usize,
}

impl<'a> Cursor<'a> {
    /// Cursor at the start of a message or body (offset 0).
    pub fn new(sig: &'a [u8], data: &'a [u8]) -> Self {
        Self::with_base(sig, data, 0)
    }

    /// Cursor whose first data byte sits `offset` bytes into the message.
    pub fn with_base(sig: &'a [u8], data: &'a [u8], offset: usize) -> Self {
        Self {
            sig,
            data,
            offset,
            depth: 0,
        }
    }

    pub fn signature(&self) -> &'a [u8] {
        self.sig
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn peek_code(&self) -> Option<u8> {
        self.sig.first().copied()
    }

    pub(crate) fn with_signature(self, sig: &'a [u8]) -> Self {
        Self { sig, ..self }
    }

    /// Drop the leading signature byte.
    pub(crate) fn eat_code(self) -> Self {
        let sig = self.sig.get(1..).unwrap_or_default();
        Self { sig, ..self }
    }

    /// Enter one container level.
    pub(crate) fn nested(self) -> Result<Self, WireError> {
        if self.depth >= layout::MAX_DEPTH {
            return Err(self.bad_format("containers nested too deeply"));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }

    /// Leave container levels entered since `outer` was taken.
    pub(crate) fn at_depth_of(self, outer: &Cursor<'a>) -> Self {
        Self {
            depth: outer.depth,
            ..self
        }
    }

    /// Consume `len` data bytes.
    pub(crate) fn take(self, len: usize) -> Result<(Self, &'a [u8]), WireError> {
        if len > self.data.len() {
            return Err(self.bad_format("value runs past end of buffer"));
        }
        let (head, tail) = self.data.split_at(len);
        let next = Self {
            data: tail,
            offset: self.offset + len,
            ..self
        };
        Ok((next, head))
    }

    pub(crate) fn take_array<const N: usize>(self) -> Result<(Self, [u8; N]), WireError> {
        let (next, bytes) = self.take(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok((next, out))
    }

    /// Split the data into a cursor over the next `len` bytes and one after it.
    ///
    /// Both halves keep the current signature; callers rescope them.
    pub(crate) fn split(self, len: usize) -> Result<(Self, Self), WireError> {
        let (after, head) = self.take(len)?;
        Ok((Self { data: head, ..self }, after))
    }

    pub(crate) fn bad_format(&self, reason: &'static str) -> WireError {
        WireError::bad_format(self.offset, reason)
    }
}

/// Advance the cursor to the next multiple of `align`.
///
/// Every skipped byte must be present and zero.
///
/// # Examples
/// ```
/// use ipcwire_core::wire::cursor::{Cursor, align_up};
///
/// let data = [7u8, 0, 0, 0, 1];
/// let cursor = Cursor::with_base(b"", &data[1..], 1);
/// let aligned = align_up(cursor, 4).unwrap();
/// assert_eq!(aligned.offset(), 4);
/// assert_eq!(aligned.remaining(), 1);
/// ```
///
/// # Errors
/// `BadFormat` when padding runs past the buffer or contains a non-zero byte.
pub fn align_up<'a>(cursor: Cursor<'a>, align: usize) -> Result<Cursor<'a>, WireError> {
    let mut cursor = cursor;
    while cursor.offset % align != 0 {
        let (&byte, rest) = cursor
            .data
            .split_first()
            .ok_or_else(|| cursor.bad_format("padding runs past end of buffer"))?;
        if byte != layout::NUL {
            return Err(cursor.bad_format("non-zero padding byte"));
        }
        cursor = Cursor {
            data: rest,
            offset: cursor.offset + 1,
            ..cursor
        };
    }
    Ok(cursor)
}

#[cfg(test)]
mod tests {
    use super::{Cursor, align_up};
    use crate::wire::error::WireError;

    #[test]
    fn aligned_cursor_is_unchanged() {
        let data = [1u8, 2, 3, 4];
        let cursor = Cursor::new(b"", &data);
        assert_eq!(align_up(cursor, 8).unwrap(), cursor);
    }

    #[test]
    fn skips_zero_padding() {
        let data = [9u8, 0, 0, 0, 0, 0, 0, 0, 5];
        let cursor = Cursor::new(b"", &data).take(1).unwrap().0;
        let aligned = align_up(cursor, 8).unwrap();
        assert_eq!(aligned.offset(), 8);
        assert_eq!(aligned.data(), &[5]);
    }

    #[test]
    fn non_zero_padding_fails() {
        let data = [9u8, 0, 1, 0];
        let cursor = Cursor::new(b"", &data).take(1).unwrap().0;
        assert_eq!(
            align_up(cursor, 4),
            Err(WireError::BadFormat {
                offset: 2,
                reason: "non-zero padding byte"
            })
        );
    }

    #[test]
    fn padding_past_end_fails() {
        let data = [9u8, 0];
        let cursor = Cursor::new(b"", &data).take(1).unwrap().0;
        assert!(matches!(
            align_up(cursor, 4),
            Err(WireError::BadFormat { offset: 2, .. })
        ));
    }

    #[test]
    fn split_scopes_data() {
        let data = [1u8, 2, 3, 4, 5];
        let (inner, after) = Cursor::new(b"i", &data).split(3).unwrap();
        assert_eq!(inner.data(), &[1, 2, 3]);
        assert_eq!(inner.offset(), 0);
        assert_eq!(after.data(), &[4, 5]);
        assert_eq!(after.offset(), 3);
    }

    #[test]
    fn take_past_end_fails() {
        let data = [1u8, 2];
        assert!(Cursor::new(b"", &data).take(3).is_err());
    }

    #[test]
    fn nesting_is_bounded() {
        let mut cursor = Cursor::new(b"", &[]);
        for _ in 0..crate::wire::layout::MAX_DEPTH {
            cursor = cursor.nested().unwrap();
        }
        assert!(cursor.nested().is_err());
    }
}
