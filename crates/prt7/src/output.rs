use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use prt7_frame::{SessionStats, Trace};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// How a decode run ended, as reported to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Terminated,
    Exhausted,
    Interrupted,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Terminated => "terminated",
            Outcome::Exhausted => "exhausted",
            Outcome::Interrupted => "interrupted",
        }
    }
}

#[derive(Serialize)]
struct DecodeOutput<'a> {
    message: &'a str,
    outcome: Outcome,
    lines_read: u64,
    frames_applied: u64,
    lines_ignored: u64,
}

#[derive(Serialize)]
struct EncodeOutput<'a> {
    rotation: i64,
    lines: Vec<&'a str>,
}

/// Per-frame progress: stdout in the pretty format, the `info` log (stderr)
/// otherwise, so json/table/raw stdout stays machine-readable.
pub fn print_trace(trace: &Trace, format: OutputFormat) {
    match format {
        OutputFormat::Pretty => println!("{trace}"),
        OutputFormat::Json | OutputFormat::Table | OutputFormat::Raw => {
            tracing::info!("{trace}");
        }
    }
}

pub fn print_decoded(message: &str, outcome: Outcome, stats: SessionStats, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DecodeOutput {
                message,
                outcome,
                lines_read: stats.lines_read,
                frames_applied: stats.frames_applied,
                lines_ignored: stats.lines_ignored,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MESSAGE", "OUTCOME", "LINES", "FRAMES", "IGNORED"])
                .add_row(vec![
                    message.to_string(),
                    outcome.as_str().to_string(),
                    stats.lines_read.to_string(),
                    stats.frames_applied.to_string(),
                    stats.lines_ignored.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("---");
            println!(
                "outcome={} frames={} ignored={}",
                outcome.as_str(),
                stats.frames_applied,
                stats.lines_ignored
            );
            println!("message: {message}");
        }
        OutputFormat::Raw => {
            print_raw(message.as_bytes());
        }
    }
}

pub fn print_encoded(wire: &[u8], rotation: i64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let text = String::from_utf8_lossy(wire);
            let out = EncodeOutput {
                rotation,
                lines: text.lines().collect(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty | OutputFormat::Raw => print_raw(wire),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}
