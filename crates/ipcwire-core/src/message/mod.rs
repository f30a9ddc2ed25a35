//! Message framing: fixed preamble, header-field array and body.
//!
//! `layout` holds byte offsets and wire constants, `reader` the bounds-checked
//! preamble accessors, `parser` the header and whole-message drivers.

pub mod layout;
mod parser;
mod reader;

pub use parser::{HeaderField, Message, MessageType, ParsedHeader, eat_header, parse_message};

/// Flag bits of the preamble, in wire order, with their report names.
pub const FLAG_NAMES: [(u8, &str); 3] = [
    (layout::FLAG_NO_REPLY_EXPECTED, "no_reply_expected"),
    (layout::FLAG_NO_AUTO_START, "no_auto_start"),
    (
        layout::FLAG_ALLOW_INTERACTIVE_AUTHORIZATION,
        "allow_interactive_authorization",
    ),
];
