use crate::names;
use crate::wire::container::decode_variant;
use crate::wire::cursor::{Cursor, align_up};
use crate::wire::decode_body;
use crate::wire::error::WireError;
use crate::wire::layout::MAX_ARRAY_LEN;
use crate::wire::value::{Basic, Values};

use super::layout;
use super::reader::HeaderReader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    MethodCall,
    MethodReturn,
    Error,
    Signal,
}

impl MessageType {
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            layout::TYPE_METHOD_CALL => Some(MessageType::MethodCall),
            layout::TYPE_METHOD_RETURN => Some(MessageType::MethodReturn),
            layout::TYPE_ERROR => Some(MessageType::Error),
            layout::TYPE_SIGNAL => Some(MessageType::Signal),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageType::MethodCall => "method_call",
            MessageType::MethodReturn => "method_return",
            MessageType::Error => "error",
            MessageType::Signal => "signal",
        }
    }
}

/// Recognized header fields and the single type each must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Path,
    Interface,
    Member,
    ErrorName,
    ReplySerial,
    Destination,
    Sender,
    Signature,
    UnixFds,
}

impl HeaderField {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            layout::FIELD_PATH => Some(HeaderField::Path),
            layout::FIELD_INTERFACE => Some(HeaderField::Interface),
            layout::FIELD_MEMBER => Some(HeaderField::Member),
            layout::FIELD_ERROR_NAME => Some(HeaderField::ErrorName),
            layout::FIELD_REPLY_SERIAL => Some(HeaderField::ReplySerial),
            layout::FIELD_DESTINATION => Some(HeaderField::Destination),
            layout::FIELD_SENDER => Some(HeaderField::Sender),
            layout::FIELD_SIGNATURE => Some(HeaderField::Signature),
            layout::FIELD_UNIX_FDS => Some(HeaderField::UnixFds),
            _ => None,
        }
    }

    /// Signature the field's variant must carry.
    pub fn signature(self) -> &'static str {
        match self {
            HeaderField::Path => "o",
            HeaderField::Interface
            | HeaderField::Member
            | HeaderField::ErrorName
            | HeaderField::Destination
            | HeaderField::Sender => "s",
            HeaderField::Signature => "g",
            HeaderField::ReplySerial | HeaderField::UnixFds => "u",
        }
    }
}

/// Header fields borrowed from the message buffer.
///
/// Absent optional fields are `None`; `raw` is the fixed preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedHeader<'a> {
    pub raw: &'a [u8],
    pub message_type: MessageType,
    pub flags: u8,
    pub protocol_version: u8,
    pub body_len: u32,
    pub serial: u32,
    pub path: Option<&'a str>,
    pub interface: Option<&'a str>,
    pub member: Option<&'a str>,
    pub error_name: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub sender: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub reply_serial: Option<u32>,
    pub unix_fds: Option<u32>,
}

impl<'a> ParsedHeader<'a> {
    fn new(raw: &'a [u8], message_type: MessageType, flags: u8, body_len: u32, serial: u32) -> Self {
        Self {
            raw,
            message_type,
            flags,
            protocol_version: layout::PROTOCOL_VERSION,
            body_len,
            serial,
            path: None,
            interface: None,
            member: None,
            error_name: None,
            destination: None,
            sender: None,
            signature: None,
            reply_serial: None,
            unix_fds: None,
        }
    }

    /// Enforce the fields each message type must carry.
    ///
    /// # Errors
    /// `BadFormat` naming the first missing field.
    pub fn check_required_fields(&self) -> Result<(), WireError> {
        let missing = |reason| Err(WireError::bad_format(layout::PREAMBLE_LEN, reason));
        match self.message_type {
            MessageType::MethodCall => {
                if self.path.is_none() {
                    return missing("method call without PATH field");
                }
                if self.member.is_none() {
                    return missing("method call without MEMBER field");
                }
            }
            MessageType::Signal => {
                if self.path.is_none() {
                    return missing("signal without PATH field");
                }
                if self.interface.is_none() {
                    return missing("signal without INTERFACE field");
                }
                if self.member.is_none() {
                    return missing("signal without MEMBER field");
                }
            }
            MessageType::Error => {
                if self.error_name.is_none() {
                    return missing("error without ERROR_NAME field");
                }
                if self.reply_serial.is_none() {
                    return missing("error without REPLY_SERIAL field");
                }
            }
            MessageType::MethodReturn => {
                if self.reply_serial.is_none() {
                    return missing("method return without REPLY_SERIAL field");
                }
            }
        }
        Ok(())
    }
}

/// Parse the fixed preamble and header-field array at the start of `stream`.
///
/// On success `stream` is advanced past the field array and the number of
/// consumed bytes is returned alongside the header. On failure `stream` is
/// left untouched.
///
/// # Errors
/// - `TooSmall` when the buffer is shorter than the fixed header.
/// - `BadAlignment` when the stream does not start on an 8-byte boundary.
/// - `NotSupported` for big-endian messages, unknown message types, other
///   protocol versions and unrecognized header fields.
/// - `BadFormat` for anything else malformed.
pub fn eat_header<'a>(stream: &mut &'a [u8]) -> Result<(ParsedHeader<'a>, usize), WireError> {
    let data: &'a [u8] = *stream;
    let reader = HeaderReader::new(data);
    reader.require_len(layout::FIXED_HEADER_LEN)?;
    reader.require_aligned()?;

    match reader.read_u8(layout::ENDIAN_OFFSET)? {
        layout::LITTLE_ENDIAN => {}
        layout::BIG_ENDIAN => {
            return Err(WireError::NotSupported {
                reason: "big-endian messages",
            });
        }
        _ => {
            return Err(WireError::bad_format(
                layout::ENDIAN_OFFSET,
                "unknown endianness marker",
            ));
        }
    }

    let message_type = match reader.read_u8(layout::MESSAGE_TYPE_OFFSET)? {
        0 => {
            return Err(WireError::bad_format(
                layout::MESSAGE_TYPE_OFFSET,
                "message type 0 is invalid",
            ));
        }
        value => MessageType::from_wire(value).ok_or(WireError::NotSupported {
            reason: "unknown message type",
        })?,
    };
    let flags = reader.read_u8(layout::FLAGS_OFFSET)?;
    if reader.read_u8(layout::PROTOCOL_VERSION_OFFSET)? != layout::PROTOCOL_VERSION {
        return Err(WireError::NotSupported {
            reason: "protocol version",
        });
    }

    let body_len = reader.read_u32_le(layout::BODY_LEN_RANGE)?;
    let serial = reader.read_u32_le(layout::SERIAL_RANGE)?;
    if serial == 0 {
        return Err(WireError::bad_format(
            layout::SERIAL_RANGE.start,
            "serial must be non-zero",
        ));
    }

    let fields_len = reader.read_u32_le(layout::FIELDS_LEN_RANGE)?;
    if fields_len > MAX_ARRAY_LEN {
        return Err(WireError::bad_format(
            layout::FIELDS_LEN_RANGE.start,
            "header field array longer than 64 MiB",
        ));
    }
    let fields_end = layout::FIXED_HEADER_LEN + fields_len as usize;
    let fields = data
        .get(layout::FIXED_HEADER_LEN..fields_end)
        .ok_or(WireError::bad_format(
            layout::FIXED_HEADER_LEN,
            "header field array runs past end of buffer",
        ))?;

    let raw = reader.read_slice(0..layout::PREAMBLE_LEN)?;
    let mut header = ParsedHeader::new(raw, message_type, flags, body_len, serial);
    let mut cursor = Cursor::with_base(b"", fields, layout::FIXED_HEADER_LEN);
    while cursor.remaining() > 0 {
        cursor = eat_field(cursor, &mut header)?;
    }

    *stream = &data[fields_end..];
    Ok((header, fields_end))
}

/// One header field: 8-aligned BYTE id, then a VARIANT of the field's type.
fn eat_field<'a>(cursor: Cursor<'a>, header: &mut ParsedHeader<'a>) -> Result<Cursor<'a>, WireError> {
    let cursor = align_up(cursor, layout::FIELD_ALIGN)?;
    let field_at = cursor.offset();
    let (cursor, [id]) = cursor.take_array::<1>()?;
    let (next, variant) = decode_variant(cursor.with_signature(b"v"))?;

    let field = HeaderField::from_id(id).ok_or(WireError::NotSupported {
        reason: "unknown header field",
    })?;
    if variant.signature() != field.signature() {
        return Err(WireError::bad_format(
            field_at,
            "header field carries the wrong type",
        ));
    }
    let value = variant
        .value()?
        .as_basic()
        .ok_or(WireError::bad_format(field_at, "header field is not a basic value"))?;

    let invalid = |reason| WireError::bad_format(field_at, reason);
    match (field, value) {
        (HeaderField::Path, Basic::ObjectPath(path)) => {
            if !names::is_valid_object_path(path) {
                return Err(invalid("invalid object path in PATH field"));
            }
            header.path = Some(path);
        }
        (HeaderField::Interface, Basic::Str(name)) => {
            if !names::is_valid_interface(name) {
                return Err(invalid("invalid interface name in INTERFACE field"));
            }
            header.interface = Some(name);
        }
        (HeaderField::Member, Basic::Str(name)) => {
            if !names::is_valid_member(name) {
                return Err(invalid("invalid member name in MEMBER field"));
            }
            header.member = Some(name);
        }
        (HeaderField::ErrorName, Basic::Str(name)) => {
            if !names::is_valid_error_name(name) {
                return Err(invalid("invalid error name in ERROR_NAME field"));
            }
            header.error_name = Some(name);
        }
        (HeaderField::Destination, Basic::Str(name)) => {
            if !names::is_valid_bus_name(name) {
                return Err(invalid("invalid bus name in DESTINATION field"));
            }
            header.destination = Some(name);
        }
        (HeaderField::Sender, Basic::Str(name)) => {
            if !names::is_valid_bus_name(name) {
                return Err(invalid("invalid bus name in SENDER field"));
            }
            header.sender = Some(name);
        }
        (HeaderField::Signature, Basic::Signature(sig)) => header.signature = Some(sig),
        (HeaderField::ReplySerial, Basic::UInt32(serial)) => header.reply_serial = Some(serial),
        (HeaderField::UnixFds, Basic::UInt32(count)) => header.unix_fds = Some(count),
        _ => return Err(invalid("header field carries the wrong type")),
    }
    Ok(next)
}

/// A complete message: header, padding, and a body validated against the
/// SIGNATURE field.
#[derive(Debug, Clone, Copy)]
pub struct Message<'a> {
    pub header: ParsedHeader<'a>,
    /// Bytes before the body, including the padding after the field array.
    pub header_len: usize,
    pub body: &'a [u8],
    values: Values<'a>,
}

impl<'a> Message<'a> {
    /// Total encoded length of the message.
    pub fn len(&self) -> usize {
        self.header_len + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Body values, in signature order.
    pub fn body_values(&self) -> Values<'a> {
        self.values
    }
}

/// Parse one whole message from the start of `stream`.
///
/// On success `stream` is advanced past the body.
///
/// # Errors
/// Everything [`eat_header`] reports, plus `TooSmall` when the body is
/// truncated and `BadFormat` for a body that does not match its signature.
pub fn parse_message<'a>(stream: &mut &'a [u8]) -> Result<Message<'a>, WireError> {
    let data: &'a [u8] = *stream;
    let mut rest = data;
    let (header, fields_end) = eat_header(&mut rest)?;

    let body_start = align_up(Cursor::with_base(b"", rest, fields_end), layout::MESSAGE_ALIGN)?;
    let header_len = body_start.offset();
    let total = header_len + header.body_len as usize;
    if total > layout::MAX_MESSAGE_LEN {
        return Err(WireError::bad_format(
            layout::BODY_LEN_RANGE.start,
            "message longer than 128 MiB",
        ));
    }
    let body = data.get(header_len..total).ok_or(WireError::TooSmall {
        needed: total,
        actual: data.len(),
    })?;

    let signature = header.signature.unwrap_or_default();
    if signature.is_empty() && !body.is_empty() {
        return Err(WireError::bad_format(
            header_len,
            "body present without SIGNATURE field",
        ));
    }
    let values = decode_body(signature.as_bytes(), body).map_err(|err| match err {
        WireError::BadFormat { offset, reason } => WireError::bad_format(header_len + offset, reason),
        other => other,
    })?;

    *stream = &data[total..];
    Ok(Message {
        header,
        header_len,
        body,
        values,
    })
}
