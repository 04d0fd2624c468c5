use clap::builder::TypedValueParser;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a PRT-7 transmission and print the hidden message.
    Decode(DecodeArgs),
    /// Print the PRT-7 lines that transmit a message.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Serial device or capture file. Reads stdin when omitted.
    pub path: Option<PathBuf>,
    /// Maximum accepted line length in bytes.
    #[arg(
        long,
        env = "PRT7_MAX_LINE_LEN",
        default_value_t = prt7_transport::DEFAULT_MAX_LINE_LEN,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub max_line_len: usize,
    /// Give up after N consecutive idle reads (device read timeouts).
    #[arg(long, env = "PRT7_MAX_IDLE_POLLS")]
    pub max_idle_polls: Option<u32>,
    /// Do not emit per-frame trace lines. Traces go to stdout with
    /// `--format pretty` and to the info log on stderr otherwise.
    #[arg(long)]
    pub quiet_trace: bool,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Message to transmit.
    pub text: String,
    /// Initial wheel rotation sent as the first MAP frame.
    #[arg(long, short = 'r', default_value_t = 0, allow_hyphen_values = true)]
    pub rotation: i64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
