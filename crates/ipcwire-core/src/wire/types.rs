use super::layout;

/// Fundamental kinds of the signature alphabet.
///
/// Each kind owns exactly one type code; the code, alignment and display name
/// are resolved by `match`, so there is no table ordinal to drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigType {
    Array,
    Boolean,
    Double,
    DictEntry,
    Float,
    Signature,
    Token,
    Int32,
    Int16,
    ObjectPath,
    UInt16,
    Struct,
    String,
    UInt64,
    UInt32,
    Variant,
    Int64,
    Byte,
}

impl SigType {
    pub const ALL: [SigType; 18] = [
        SigType::Array,
        SigType::Boolean,
        SigType::Double,
        SigType::DictEntry,
        SigType::Float,
        SigType::Signature,
        SigType::Token,
        SigType::Int32,
        SigType::Int16,
        SigType::ObjectPath,
        SigType::UInt16,
        SigType::Struct,
        SigType::String,
        SigType::UInt64,
        SigType::UInt32,
        SigType::Variant,
        SigType::Int64,
        SigType::Byte,
    ];

    /// Resolve a one-character type code.
    ///
    /// Returns `None` for any byte outside the alphabet, including NUL and the
    /// bracket characters (`(`, `)`, `{`, `}`), which are grammar, not codes.
    ///
    /// # Examples
    /// ```
    /// use ipcwire_core::SigType;
    ///
    /// assert_eq!(SigType::from_code(b'u'), Some(SigType::UInt32));
    /// assert_eq!(SigType::from_code(b'z'), None);
    /// assert_eq!(SigType::from_code(0), None);
    /// ```
    pub const fn from_code(code: u8) -> Option<SigType> {
        let kind = match code {
            b'a' => SigType::Array,
            b'b' => SigType::Boolean,
            b'd' => SigType::Double,
            b'e' => SigType::DictEntry,
            b'f' => SigType::Float,
            b'g' => SigType::Signature,
            b'h' => SigType::Token,
            b'i' => SigType::Int32,
            b'n' => SigType::Int16,
            b'o' => SigType::ObjectPath,
            b'q' => SigType::UInt16,
            b'r' => SigType::Struct,
            b's' => SigType::String,
            b't' => SigType::UInt64,
            b'u' => SigType::UInt32,
            b'v' => SigType::Variant,
            b'x' => SigType::Int64,
            b'y' => SigType::Byte,
            _ => return None,
        };
        Some(kind)
    }

    pub const fn code(self) -> u8 {
        match self {
            SigType::Array => b'a',
            SigType::Boolean => b'b',
            SigType::Double => b'd',
            SigType::DictEntry => b'e',
            SigType::Float => b'f',
            SigType::Signature => b'g',
            SigType::Token => b'h',
            SigType::Int32 => b'i',
            SigType::Int16 => b'n',
            SigType::ObjectPath => b'o',
            SigType::UInt16 => b'q',
            SigType::Struct => b'r',
            SigType::String => b's',
            SigType::UInt64 => b't',
            SigType::UInt32 => b'u',
            SigType::Variant => b'v',
            SigType::Int64 => b'x',
            SigType::Byte => b'y',
        }
    }

    /// Required byte alignment of a value of this kind.
    pub const fn alignment(self) -> usize {
        match self {
            SigType::Signature | SigType::Variant | SigType::Byte => 1,
            SigType::Int16 | SigType::UInt16 => 2,
            SigType::Array
            | SigType::Boolean
            | SigType::Float
            | SigType::Token
            | SigType::Int32
            | SigType::ObjectPath
            | SigType::String
            | SigType::UInt32 => 4,
            SigType::Double
            | SigType::DictEntry
            | SigType::Struct
            | SigType::UInt64
            | SigType::Int64 => 8,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            SigType::Array => "ARRAY",
            SigType::Boolean => "BOOLEAN",
            SigType::Double => "DOUBLE",
            SigType::DictEntry => "DICTENT",
            SigType::Float => "FLOAT",
            SigType::Signature => "SIG",
            SigType::Token => "TOKEN",
            SigType::Int32 => "INT32",
            SigType::Int16 => "INT16",
            SigType::ObjectPath => "OBJPATH",
            SigType::UInt16 => "UINT16",
            SigType::Struct => "STRUCT",
            SigType::String => "STRZ",
            SigType::UInt64 => "UINT64",
            SigType::UInt32 => "UINT32",
            SigType::Variant => "VARIANT",
            SigType::Int64 => "INT64",
            SigType::Byte => "BYTE",
        }
    }

    /// Basic kinds are the ones usable as a dict-entry key.
    pub const fn is_basic(self) -> bool {
        !matches!(
            self,
            SigType::Array | SigType::Struct | SigType::DictEntry | SigType::Variant
        )
    }
}

/// Alignment of the first value described by `sig`, if `sig` starts a type.
///
/// Brackets map to the container alignment; anything else goes through the
/// type table.
pub(crate) fn leading_alignment(sig: &[u8]) -> Option<usize> {
    match sig.first().copied()? {
        layout::STRUCT_OPEN | layout::DICT_OPEN => Some(layout::CONTAINER_ALIGN),
        code => SigType::from_code(code).map(SigType::alignment),
    }
}

#[cfg(test)]
mod tests {
    use super::{SigType, leading_alignment};

    #[test]
    fn codes_round_trip_through_lookup() {
        for kind in SigType::ALL {
            assert_eq!(SigType::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn table_alignments() {
        let expected = [
            (b'a', 4),
            (b'b', 4),
            (b'd', 8),
            (b'e', 8),
            (b'f', 4),
            (b'g', 1),
            (b'h', 4),
            (b'i', 4),
            (b'n', 2),
            (b'o', 4),
            (b'q', 2),
            (b'r', 8),
            (b's', 4),
            (b't', 8),
            (b'u', 4),
            (b'v', 1),
            (b'x', 8),
            (b'y', 1),
        ];
        for (code, align) in expected {
            let kind = SigType::from_code(code).unwrap();
            assert_eq!(kind.alignment(), align, "alignment of {}", code as char);
        }
    }

    #[test]
    fn brackets_and_nul_are_not_codes() {
        for code in [b'(', b')', b'{', b'}', 0, b'c', b'z'] {
            assert_eq!(SigType::from_code(code), None);
        }
    }

    #[test]
    fn containers_are_not_basic() {
        assert!(SigType::String.is_basic());
        assert!(SigType::Double.is_basic());
        assert!(!SigType::Array.is_basic());
        assert!(!SigType::Variant.is_basic());
        assert!(!SigType::Struct.is_basic());
        assert!(!SigType::DictEntry.is_basic());
    }

    #[test]
    fn leading_alignment_of_brackets() {
        assert_eq!(leading_alignment(b"(ii)"), Some(8));
        assert_eq!(leading_alignment(b"{sv}"), Some(8));
        assert_eq!(leading_alignment(b"q"), Some(2));
        assert_eq!(leading_alignment(b""), None);
    }
}
