pub const STRUCT_OPEN: u8 = b'(';
pub const STRUCT_CLOSE: u8 = b')';
pub const DICT_OPEN: u8 = b'{';
pub const DICT_CLOSE: u8 = b'}';
pub const NUL: u8 = 0;

pub const CONTAINER_ALIGN: usize = 8;

/// A signature length must fit the one-byte prefix of a SIG value.
pub const MAX_SIGNATURE_LEN: usize = 255;
pub const MAX_ARRAY_LEN: u32 = 1 << 26;
/// Container nesting limit shared by signature grammar and data walks.
pub const MAX_DEPTH: usize = 64;

/// Smallest meaningful dict-entry signature: `{`, key, value, `}`.
pub const MIN_DICT_ENTRY_LEN: usize = 4;
