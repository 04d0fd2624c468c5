//! Minimal decoder — reads PRT-7 lines from stdin and prints the message.
//!
//! Run with:
//!   printf 'M,1\nL,G\nL,h\nEND\n' | cargo run --example decode-stdin

use prt7::frame::{Session, SessionState};
use prt7::transport::LineReader;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = LineReader::new(std::io::stdin().lock());
    let mut session = Session::new();
    let running = std::sync::atomic::AtomicBool::new(true);

    let state = session.run_with(&mut reader, &running, |trace| eprintln!("{trace}"))?;
    if state == SessionState::Exhausted {
        eprintln!("stream closed before END");
    }

    println!("{}", session.message());
    Ok(())
}
