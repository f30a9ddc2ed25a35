//! Byte offsets and constants of the message preamble and header fields.

pub const ENDIAN_OFFSET: usize = 0;
pub const MESSAGE_TYPE_OFFSET: usize = 1;
pub const FLAGS_OFFSET: usize = 2;
pub const PROTOCOL_VERSION_OFFSET: usize = 3;
pub const BODY_LEN_RANGE: std::ops::Range<usize> = 4..8;
pub const SERIAL_RANGE: std::ops::Range<usize> = 8..12;
pub const FIELDS_LEN_RANGE: std::ops::Range<usize> = 12..16;

/// Fixed preamble: endian, type, flags, version, body length, serial.
pub const PREAMBLE_LEN: usize = 12;
/// Preamble plus the UINT32 byte length of the header-field array.
pub const FIXED_HEADER_LEN: usize = FIELDS_LEN_RANGE.end;

pub const LITTLE_ENDIAN: u8 = b'l';
pub const BIG_ENDIAN: u8 = b'B';
pub const PROTOCOL_VERSION: u8 = 1;

pub const MESSAGE_ALIGN: usize = 8;
pub const MAX_MESSAGE_LEN: usize = 1 << 27;

pub const TYPE_METHOD_CALL: u8 = 1;
pub const TYPE_METHOD_RETURN: u8 = 2;
pub const TYPE_ERROR: u8 = 3;
pub const TYPE_SIGNAL: u8 = 4;

pub const FLAG_NO_REPLY_EXPECTED: u8 = 0x01;
pub const FLAG_NO_AUTO_START: u8 = 0x02;
pub const FLAG_ALLOW_INTERACTIVE_AUTHORIZATION: u8 = 0x04;

pub const FIELD_PATH: u8 = 1;
pub const FIELD_INTERFACE: u8 = 2;
pub const FIELD_MEMBER: u8 = 3;
pub const FIELD_ERROR_NAME: u8 = 4;
pub const FIELD_REPLY_SERIAL: u8 = 5;
pub const FIELD_DESTINATION: u8 = 6;
pub const FIELD_SENDER: u8 = 7;
pub const FIELD_SIGNATURE: u8 = 8;
pub const FIELD_UNIX_FDS: u8 = 9;

/// Every header field starts on an 8-byte boundary.
pub const FIELD_ALIGN: usize = 8;
