use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use prt7_frame::{Session, SessionState};
use prt7_transport::{open_device, LineConfig, LineReader};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, transport_error, CliError, CliResult, SUCCESS};
use crate::output::{print_decoded, print_trace, Outcome, OutputFormat};

/// Exit code for a second Ctrl-C while blocked on input.
const SIGINT_EXIT: i32 = 130;

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = LineConfig {
        max_line_len: args.max_line_len,
        max_idle_polls: args.max_idle_polls,
        ..LineConfig::default()
    };

    let input: Box<dyn Read> = match &args.path {
        Some(path) => {
            Box::new(open_device(path).map_err(|err| transport_error("open failed", err))?)
        }
        None => Box::new(std::io::stdin().lock()),
    };
    let mut reader = LineReader::with_config(input, config);

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let source_name = args
        .path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());
    tracing::info!(source = %source_name, "decoding PRT-7 session");

    let mut session = Session::new();
    let show_trace = !args.quiet_trace;
    let state = session
        .run_with(&mut reader, &running, |trace| {
            if show_trace {
                print_trace(trace, format);
            }
        })
        .map_err(|err| frame_error("decode failed", err))?;

    let outcome = match state {
        SessionState::Terminated => Outcome::Terminated,
        SessionState::Exhausted => Outcome::Exhausted,
        SessionState::Running => Outcome::Interrupted,
    };
    print_decoded(&session.message(), outcome, session.stats(), format);

    Ok(SUCCESS)
}

// The first Ctrl-C stops the loop at the next line boundary; a second one
// exits immediately.
fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if !running.swap(false, Ordering::SeqCst) {
            std::process::exit(SIGINT_EXIT);
        }
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
