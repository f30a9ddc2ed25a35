use thiserror::Error;

/// Errors returned by signature validation, value decoding and header parsing.
///
/// The first failure anywhere in a decode aborts the whole walk and is
/// returned unchanged; there is no partial success.
///
/// # Examples
/// ```
/// use ipcwire_core::{ErrorKind, WireError};
///
/// let err = WireError::BadFormat {
///     offset: 4,
///     reason: "non-zero padding byte",
/// };
/// assert_eq!(err.kind(), ErrorKind::BadFormat);
/// assert!(err.to_string().contains("offset 4"));
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    #[error("invalid argument: {reason}")]
    BadArgument { reason: &'static str },
    #[error("buffer too small: need {needed} bytes, got {actual}")]
    TooSmall { needed: usize, actual: usize },
    #[error("message start is not 8-byte aligned")]
    BadAlignment,
    /// `offset` is a byte offset from the message start, or a position in
    /// the signature for grammar errors.
    #[error("malformed data at offset {offset}: {reason}")]
    BadFormat { offset: usize, reason: &'static str },
    #[error("not supported: {reason}")]
    NotSupported { reason: &'static str },
    #[error("empty signature")]
    Empty,
}

/// Error category without context, for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadArgument,
    TooSmall,
    BadAlignment,
    BadFormat,
    NotSupported,
    Empty,
}

impl WireError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WireError::BadArgument { .. } => ErrorKind::BadArgument,
            WireError::TooSmall { .. } => ErrorKind::TooSmall,
            WireError::BadAlignment => ErrorKind::BadAlignment,
            WireError::BadFormat { .. } => ErrorKind::BadFormat,
            WireError::NotSupported { .. } => ErrorKind::NotSupported,
            WireError::Empty => ErrorKind::Empty,
        }
    }

    pub(crate) fn bad_format(offset: usize, reason: &'static str) -> Self {
        WireError::BadFormat { offset, reason }
    }

    /// Turn an `Empty` error into a `BadFormat` at the given signature offset.
    ///
    /// Used wherever a nested type is mandatory (array element, dict-entry
    /// member, variant body), so a missing type is a grammar violation.
    pub(crate) fn empty_as_bad_format(self, offset: usize, reason: &'static str) -> Self {
        match self {
            WireError::Empty => WireError::BadFormat { offset, reason },
            other => other,
        }
    }
}
