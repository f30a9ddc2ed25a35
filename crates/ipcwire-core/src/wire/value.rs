//! Decoded values.
//!
//! Basic values are copied out (scalars) or borrowed (`&str` into the
//! caller's buffer). Containers are lazy views: they keep the cursor they were
//! validated with and walk it again on demand, so nothing is allocated and no
//! payload bytes are copied.

use std::str;

use super::container::decode_single;
use super::cursor::Cursor;
use super::error::WireError;
use super::types::SigType;

/// A value of a basic (non-container) kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Basic<'a> {
    Byte(u8),
    Boolean(bool),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Double(f64),
    Float(f32),
    Token(u32),
    Str(&'a str),
    ObjectPath(&'a str),
    Signature(&'a str),
}

impl<'a> Basic<'a> {
    pub fn kind(&self) -> SigType {
        match self {
            Basic::Byte(_) => SigType::Byte,
            Basic::Boolean(_) => SigType::Boolean,
            Basic::Int16(_) => SigType::Int16,
            Basic::UInt16(_) => SigType::UInt16,
            Basic::Int32(_) => SigType::Int32,
            Basic::UInt32(_) => SigType::UInt32,
            Basic::Int64(_) => SigType::Int64,
            Basic::UInt64(_) => SigType::UInt64,
            Basic::Double(_) => SigType::Double,
            Basic::Float(_) => SigType::Float,
            Basic::Token(_) => SigType::Token,
            Basic::Str(_) => SigType::String,
            Basic::ObjectPath(_) => SigType::ObjectPath,
            Basic::Signature(_) => SigType::Signature,
        }
    }

    /// Text of a string, object path or signature.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Basic::Str(text) | Basic::ObjectPath(text) | Basic::Signature(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match *self {
            Basic::UInt32(value) => Some(value),
            _ => None,
        }
    }
}

/// Any decoded value.
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Basic(Basic<'a>),
    Array(Array<'a>),
    Struct(Struct<'a>),
    DictEntry(DictEntry<'a>),
    Variant(Variant<'a>),
}

impl<'a> Value<'a> {
    pub fn as_basic(&self) -> Option<Basic<'a>> {
        match *self {
            Value::Basic(basic) => Some(basic),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<Array<'a>> {
        match *self {
            Value::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<Variant<'a>> {
        match *self {
            Value::Variant(variant) => Some(variant),
            _ => None,
        }
    }
}

/// Validated array: element signature, element count and the scoped bytes.
#[derive(Debug, Clone, Copy)]
pub struct Array<'a> {
    pub(crate) element: &'a [u8],
    pub(crate) count: usize,
    pub(crate) body: Cursor<'a>,
}

impl<'a> Array<'a> {
    pub fn element_signature(&self) -> &'a str {
        signature_text(self.element)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Element bytes, excluding the length prefix and leading padding.
    pub fn bytes(&self) -> &'a [u8] {
        self.body.data()
    }

    pub fn iter(&self) -> Elements<'a> {
        Elements {
            cursor: self.body,
            element: self.element,
            remaining: self.count,
        }
    }
}

impl<'a> IntoIterator for &Array<'a> {
    type Item = Result<Value<'a>, WireError>;
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`Array`].
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    cursor: Cursor<'a>,
    element: &'a [u8],
    remaining: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Result<Value<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        match decode_single(self.cursor.with_signature(self.element), true) {
            Ok((next, value)) => {
                self.cursor = next;
                Some(Ok(value))
            }
            Err(err) => {
                self.remaining = 0;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Validated struct; `fields()` walks its members in order.
#[derive(Debug, Clone, Copy)]
pub struct Struct<'a> {
    pub(crate) fields: Cursor<'a>,
}

impl<'a> Struct<'a> {
    /// Member signature without the surrounding parentheses.
    pub fn signature(&self) -> &'a str {
        signature_text(self.fields.signature())
    }

    pub fn fields(&self) -> Values<'a> {
        Values::new(self.fields)
    }
}

/// Validated dict entry: a basic key and one value of any type.
#[derive(Debug, Clone, Copy)]
pub struct DictEntry<'a> {
    pub(crate) key: Basic<'a>,
    pub(crate) value: Cursor<'a>,
}

impl<'a> DictEntry<'a> {
    pub fn key(&self) -> Basic<'a> {
        self.key
    }

    pub fn value_signature(&self) -> &'a str {
        signature_text(self.value.signature())
    }

    pub fn value(&self) -> Result<Value<'a>, WireError> {
        decode_single(self.value, false).map(|(_, value)| value)
    }
}

/// Validated variant: embedded signature plus the value it describes.
#[derive(Debug, Clone, Copy)]
pub struct Variant<'a> {
    pub(crate) signature: &'a str,
    pub(crate) body: Cursor<'a>,
}

impl<'a> Variant<'a> {
    pub fn signature(&self) -> &'a str {
        self.signature
    }

    pub fn value(&self) -> Result<Value<'a>, WireError> {
        decode_single(self.body, false).map(|(_, value)| value)
    }
}

/// Sequence of complete values described by a cursor's signature.
///
/// Yields one value per complete type until the signature is exhausted.
#[derive(Debug, Clone, Copy)]
pub struct Values<'a> {
    cursor: Cursor<'a>,
    failed: bool,
}

impl<'a> Values<'a> {
    pub(crate) fn new(cursor: Cursor<'a>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }

    pub fn signature(&self) -> &'a str {
        signature_text(self.cursor.signature())
    }
}

impl<'a> Iterator for Values<'a> {
    type Item = Result<Value<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.cursor.peek_code().is_none() {
            return None;
        }
        match decode_single(self.cursor, false) {
            Ok((next, value)) => {
                self.cursor = next;
                Some(Ok(value))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Signatures reaching a view were grammar-checked, so they are ASCII.
fn signature_text(sig: &[u8]) -> &str {
    str::from_utf8(sig).unwrap_or_default()
}
