use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use ipcwire_core::{InspectError, InspectOptions, NameKind, WireError};
use serde::Serialize;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("IPCWIRE_BUILD_COMMIT"),
    ", built ",
    env!("IPCWIRE_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ipcwire")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline validator and inspector for message-bus IPC wire data.",
    long_about = None,
    after_help = "Examples:\n  ipcwire message inspect message.bin -o report.json\n  ipcwire sig check 'a{sv}'\n  ipcwire name check --kind interface org.example.Echo"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on captured message files.
    Message {
        #[command(subcommand)]
        command: MessageCommands,
    },
    /// Type signature checks.
    Sig {
        #[command(subcommand)]
        command: SigCommands,
    },
    /// Object path and name checks.
    Name {
        #[command(subcommand)]
        command: NameCommands,
    },
}

#[derive(Subcommand, Debug)]
enum MessageCommands {
    /// Validate one message file and write a versioned JSON report.
    #[command(alias = "decode")]
    #[command(
        after_help = "Examples:\n  ipcwire message inspect message.bin -o report.json\n  ipcwire message decode 'captures/*.bin' --stdout --pretty"
    )]
    Inspect {
        /// Path (or glob pattern matching one file) of a raw message
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,

        /// Also require the header fields mandatory for the message type
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SigCommands {
    /// Check that a signature is made of complete, well-formed types.
    Check {
        signature: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
enum NameCommands {
    /// Check a name against one of the name grammars.
    Check {
        /// Grammar to check against
        #[arg(long, value_enum)]
        kind: NameArg,

        name: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum NameArg {
    ObjectPath,
    Interface,
    Member,
    Error,
    Bus,
}

impl From<NameArg> for NameKind {
    fn from(arg: NameArg) -> Self {
        match arg {
            NameArg::ObjectPath => NameKind::ObjectPath,
            NameArg::Interface => NameKind::Interface,
            NameArg::Member => NameKind::Member,
            NameArg::Error => NameKind::Error,
            NameArg::Bus => NameKind::Bus,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Message { command } => match command {
            MessageCommands::Inspect {
                input,
                report,
                stdout,
                pretty,
                compact,
                quiet,
                strict,
            } => cmd_message_inspect(input, report, stdout, pretty, compact, quiet, strict),
        },
        Commands::Sig { command } => match command {
            SigCommands::Check { signature, json } => cmd_sig_check(&signature, json),
        },
        Commands::Name { command } => match command {
            NameCommands::Check { kind, name, json } => cmd_name_check(kind.into(), &name, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<InspectError> for CliError {
    fn from(err: InspectError) -> Self {
        let hint = match &err {
            InspectError::Source(_) => "check that the input is a readable file".to_string(),
            InspectError::Wire(wire) => wire_hint(wire).to_string(),
            InspectError::TrailingBytes { .. } => {
                "the file must hold exactly one message".to_string()
            }
        };
        CliError::new(format!("message inspection failed: {err}"), Some(hint))
    }
}

fn wire_hint(err: &WireError) -> &'static str {
    match err {
        WireError::TooSmall { .. } => "the message is truncated",
        WireError::NotSupported { .. } => "only little-endian protocol version 1 messages are supported",
        WireError::BadAlignment => "the message must start on an 8-byte boundary",
        WireError::BadFormat { .. } | WireError::BadArgument { .. } | WireError::Empty => {
            "the offset is counted from the start of the message"
        }
    }
}

fn cmd_message_inspect(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;

    let report_path = if stdout {
        None
    } else {
        let path = report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?;
        ensure_distinct_paths(&resolved_input, &path)?;
        Some(path)
    };

    let rep = ipcwire_core::inspect_message_file(&resolved_input, InspectOptions { strict })?;
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report_path) = report_path else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report_path, json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    if !quiet {
        eprintln!("OK: report written -> {}", report_path.display());
    }
    Ok(())
}

fn ensure_distinct_paths(input: &Path, report: &Path) -> Result<(), CliError> {
    let input_abs = fs::canonicalize(input)
        .with_context(|| format!("Failed to resolve input path: {}", input.display()))?;
    let report_dir = match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::canonicalize(parent),
        _ => fs::canonicalize("."),
    };
    // A missing output directory is created later, so it cannot be the input.
    let Ok(report_dir) = report_dir else {
        return Ok(());
    };
    let file_name = report
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Invalid report path: {}", report.display()))?;
    if report_dir.join(file_name) == input_abs {
        return Err(CliError::new(
            format!("report path must differ from input: {}", report.display()),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(
    rep: &ipcwire_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

/// Result of a `sig check` or `name check`, as printed with `--json`.
#[derive(Debug, Serialize)]
struct CheckOutput<'a> {
    kind: &'a str,
    input: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    types: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_sig_check(signature: &str, json: bool) -> Result<(), CliError> {
    let checked = ipcwire_core::sig_is_well_formed(signature.as_bytes());
    let output = CheckOutput {
        kind: "signature",
        input: signature,
        valid: checked.is_ok(),
        length: checked.ok(),
        types: checked
            .map(|_| split_complete_types(signature))
            .unwrap_or_default(),
        error: checked.err().map(|err| err.to_string()),
    };

    if json {
        print_json(&output)?;
    } else if let Ok(len) = checked {
        println!(
            "OK: signature '{}' is well formed ({} bytes, {} complete types)",
            signature,
            len,
            output.types.len()
        );
    }

    checked.map(|_| ()).map_err(|err| {
        CliError::new(
            format!("signature '{}' is malformed: {}", signature, err),
            Some("the offset is a position in the signature".to_string()),
        )
    })
}

/// Split an already well-formed signature into its complete types.
fn split_complete_types(signature: &str) -> Vec<&str> {
    let mut types = Vec::new();
    let mut rest = signature;
    while !rest.is_empty() {
        let Ok(len) = ipcwire_core::one_type_length(rest.as_bytes(), false) else {
            break;
        };
        let (head, tail) = rest.split_at(len);
        types.push(head);
        rest = tail;
    }
    types
}

fn cmd_name_check(kind: NameKind, name: &str, json: bool) -> Result<(), CliError> {
    let valid = kind.is_valid(name);
    let label = kind.label();
    if json {
        print_json(&CheckOutput {
            kind: label,
            input: name,
            valid,
            length: valid.then_some(name.len()),
            types: Vec::new(),
            error: (!valid).then(|| format!("not a valid {label}")),
        })?;
    } else if valid {
        println!("OK: '{}' is a valid {}", name, label);
    }

    if valid {
        return Ok(());
    }
    Err(CliError::new(
        format!("'{}' is not a valid {}", name, label),
        Some(name_hint(kind).to_string()),
    ))
}

fn name_hint(kind: NameKind) -> &'static str {
    match kind {
        NameKind::ObjectPath => "paths start with '/' and use non-empty [A-Za-z0-9_] elements",
        NameKind::Interface | NameKind::Error => {
            "use two or more '.'-separated [A-Za-z0-9_] elements, none starting with a digit"
        }
        NameKind::Member => "use one [A-Za-z0-9_] element not starting with a digit",
        NameKind::Bus => {
            "use ':'-prefixed unique names or '.'-separated well-known names; '-' is allowed"
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string(value).context("JSON serialization failed")?;
    println!("{}", json);
    Ok(())
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a file holding one raw message".to_string()),
        ));
    }
    let meta = fs::metadata(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    if !meta.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a file holding one raw message".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.len() > 1 {
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(
            message,
            Some("pass a single message file, or run once per file".to_string()),
        ));
    }

    matches.pop().ok_or_else(|| {
        CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )
    })
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
