//! ipcwire core library: wire-format codec for a message-bus IPC protocol.
//!
//! This crate validates untrusted message bytes against the protocol's type
//! signatures and hands back borrowed, typed values. The codec is layered
//! leaf-first (`wire`: type table, signature grammar, alignment gate,
//! primitive and container decoders, validator); `message` parses the fixed
//! header and header-field array on top of it, and `names` checks the textual
//! grammars of paths and names. All I/O is isolated in `source`; `inspect`
//! turns one message file into a deterministic report.
//!
//! Invariants:
//! - Decoding never copies payload bytes and never allocates; values borrow
//!   from the caller's buffer.
//! - Alignment is measured from the message start; all padding must be zero.
//! - The first failure aborts a decode and is returned unchanged.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use ipcwire_core::{InspectOptions, inspect_message_file};
//!
//! let report = inspect_message_file(Path::new("message.bin"), InspectOptions::default())?;
//! println!("message type: {}", report.header.message_type);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod inspect;
pub mod message;
pub mod names;
mod source;
pub mod wire;

pub use inspect::{InspectError, InspectOptions, inspect_message, inspect_message_file};
pub use message::{
    FLAG_NAMES, HeaderField, Message, MessageType, ParsedHeader, eat_header, parse_message,
};
pub use names::NameKind;
pub use source::{AlignedBuf, MessageFile, SourceError};
pub use wire::decode;
pub use wire::error::{ErrorKind, WireError};
pub use wire::grammar::{one_type_length, sig_is_well_formed};
pub use wire::types::SigType;
pub use wire::value::{Array, Basic, DictEntry, Elements, Struct, Value, Values, Variant};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when the input has no modification time.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Inspection report for one message.
///
/// Field order is fixed, so serialized reports are stable across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 modification time of the input file.
    pub generated_at: String,
    /// Input file metadata.
    pub input: InputInfo,
    /// Decoded fixed header and header fields.
    pub header: HeaderSummary,
    /// Body values in signature order.
    pub body: Vec<ValueSummary>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use ipcwire_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "ipcwire".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "ipcwire");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the inspector.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Fixed header values plus the header fields that were present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSummary {
    /// `method_call`, `method_return`, `error` or `signal`.
    pub message_type: String,
    /// Raw flag byte.
    pub flags: u8,
    /// Names of the known flag bits that are set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flag_names: Vec<String>,
    pub protocol_version: u8,
    pub serial: u32,
    pub body_len: u32,
    /// Bytes before the body, padding included.
    pub header_len: u64,
    pub fields: HeaderFields,
}

/// Header fields; absent fields are omitted from the output.
///
/// # Examples
/// ```
/// use ipcwire_core::HeaderFields;
///
/// let fields = HeaderFields {
///     path: Some("/org/example".to_string()),
///     ..HeaderFields::default()
/// };
/// let json = serde_json::to_string(&fields).unwrap();
/// assert_eq!(json, r#"{"path":"/org/example"}"#);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeaderFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_serial: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unix_fds: Option<u32>,
}

/// Owned, serializable form of a decoded value.
///
/// Serialized with a `kind` tag, e.g. `{"kind":"uint32","value":42}`.
///
/// # Examples
/// ```
/// use ipcwire_core::ValueSummary;
///
/// let value = ValueSummary::Variant {
///     signature: "u".to_string(),
///     value: Box::new(ValueSummary::Uint32 { value: 42 }),
/// };
/// let json = serde_json::to_value(&value).unwrap();
/// assert_eq!(json["kind"], "variant");
/// assert_eq!(json["value"]["value"], 42);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueSummary {
    Byte {
        value: u8,
    },
    Boolean {
        value: bool,
    },
    Int16 {
        value: i16,
    },
    Uint16 {
        value: u16,
    },
    Int32 {
        value: i32,
    },
    Uint32 {
        value: u32,
    },
    Int64 {
        value: i64,
    },
    Uint64 {
        value: u64,
    },
    Double {
        value: f64,
    },
    Float {
        value: f32,
    },
    Token {
        value: u32,
    },
    String {
        value: String,
    },
    ObjectPath {
        value: String,
    },
    Signature {
        value: String,
    },
    Array {
        /// Element signature.
        signature: String,
        elements: Vec<ValueSummary>,
    },
    Struct {
        fields: Vec<ValueSummary>,
    },
    DictEntry {
        key: Box<ValueSummary>,
        value: Box<ValueSummary>,
    },
    Variant {
        signature: String,
        value: Box<ValueSummary>,
    },
}
