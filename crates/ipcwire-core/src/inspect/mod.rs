use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::message::{FLAG_NAMES, Message, parse_message};
use crate::source::{MessageFile, SourceError};
use crate::wire::error::WireError;
use crate::{
    DEFAULT_GENERATED_AT, HeaderFields, HeaderSummary, InputInfo, REPORT_VERSION, Report, ToolInfo,
};

mod summary;

use summary::summarize_values;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Decode error: {0}")]
    Wire(#[from] WireError),
    #[error("{count} trailing bytes after the message")]
    TrailingBytes { count: usize },
}

/// Knobs for [`inspect_message`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InspectOptions {
    /// Also require the header fields mandatory for the message type.
    pub strict: bool,
}

pub fn inspect_message_file(path: &Path, options: InspectOptions) -> Result<Report, InspectError> {
    let file = MessageFile::open(path)?;
    let mut report = inspect_message(&path.display().to_string(), file.bytes(), options)?;
    report.generated_at =
        mtime_to_rfc3339(file.modified).unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    Ok(report)
}

/// Build a report for exactly one message held in `data`.
///
/// `data` must start on an 8-byte boundary (see [`crate::AlignedBuf`]).
pub fn inspect_message(
    input_path: &str,
    data: &[u8],
    options: InspectOptions,
) -> Result<Report, InspectError> {
    let mut stream = data;
    let message = parse_message(&mut stream)?;
    if !stream.is_empty() {
        return Err(InspectError::TrailingBytes {
            count: stream.len(),
        });
    }
    if options.strict {
        message.header.check_required_fields()?;
    }

    Ok(Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "ipcwire".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: data.len() as u64,
        },
        header: summarize_header(&message),
        body: summarize_values(message.body_values())?,
    })
}

fn summarize_header(message: &Message<'_>) -> HeaderSummary {
    let header = &message.header;
    let flag_names = FLAG_NAMES
        .iter()
        .filter(|(bit, _)| header.flags & bit != 0)
        .map(|(_, name)| name.to_string())
        .collect();
    let owned = |text: Option<&str>| text.map(str::to_string);

    HeaderSummary {
        message_type: header.message_type.name().to_string(),
        flags: header.flags,
        flag_names,
        protocol_version: header.protocol_version,
        serial: header.serial,
        body_len: header.body_len,
        header_len: message.header_len as u64,
        fields: HeaderFields {
            path: owned(header.path),
            interface: owned(header.interface),
            member: owned(header.member),
            error_name: owned(header.error_name),
            reply_serial: header.reply_serial,
            destination: owned(header.destination),
            sender: owned(header.sender),
            signature: owned(header.signature),
            unix_fds: header.unix_fds,
        },
    }
}

fn mtime_to_rfc3339(modified: Option<SystemTime>) -> Option<String> {
    let nanos = modified?.duration_since(UNIX_EPOCH).ok()?.as_nanos();
    OffsetDateTime::from_unix_timestamp_nanos(i128::try_from(nanos).ok()?)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
