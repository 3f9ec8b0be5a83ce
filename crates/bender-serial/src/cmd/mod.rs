use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod checksum;
pub mod decode;
pub mod monitor;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Poll a live feed and publish status reports until interrupted.
    Monitor(MonitorArgs),
    /// Decode a captured log of wire lines.
    Decode(DecodeArgs),
    /// Compute the checksum of a body, or check a framed line.
    Checksum(ChecksumArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Monitor(args) => monitor::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Checksum(args) => checksum::run(args),
        Command::Version(args) => version::run(args),
    }
}

/// Unit registration shared by commands that publish.
#[derive(Args, Debug, Default)]
pub struct UnitArgs {
    /// Register sinks for a unit id (repeatable). Default: units 0-3.
    #[arg(long = "unit", value_name = "ID")]
    pub units: Vec<u32>,
    /// JSON file listing units: {"units":[{"id":0,"name":"bender-0"}]}.
    #[arg(long, value_name = "FILE")]
    pub units_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial device to read, or `-` for stdin.
    #[arg(required_unless_present = "bridge", conflicts_with = "bridge")]
    pub device: Option<PathBuf>,
    /// Connect to a serial bridge on a Unix domain socket instead of a device.
    #[arg(long, value_name = "SOCKET")]
    pub bridge: Option<PathBuf>,
    /// Time between polls (e.g. 20ms, 1s).
    #[arg(long, default_value = "20ms")]
    pub poll_interval: String,
    /// Exit after N reports.
    #[arg(long)]
    pub count: Option<usize>,
    /// Longest accepted line in bytes; 0 disables the limit.
    #[arg(long, default_value_t = bender_frame::DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
    /// Only print the summary on exit, not each report.
    #[arg(long)]
    pub quiet: bool,
    #[command(flatten)]
    pub units: UnitArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode, or `-` for stdin.
    pub file: PathBuf,
    /// Also print lines that were rejected.
    #[arg(long)]
    pub show_rejected: bool,
    /// Exit with a data error if any line is rejected.
    #[arg(long)]
    pub strict: bool,
    /// Longest accepted line in bytes; 0 disables the limit.
    #[arg(long, default_value_t = bender_frame::DEFAULT_MAX_LINE_LEN)]
    pub max_line_len: usize,
}

#[derive(Args, Debug)]
pub struct ChecksumArgs {
    /// Message body, or a complete line with --check.
    pub input: String,
    /// Validate a framed line instead of framing a body.
    #[arg(long)]
    pub check: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// `--max-line-len` value to framer config.
pub fn max_line_len(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    match unit {
        "s" => Ok(Duration::from_secs(value)),
        _ => Ok(Duration::from_millis(value)),
    }
}
