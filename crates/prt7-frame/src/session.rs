use std::sync::atomic::{AtomicBool, Ordering};

use prt7_transport::LineSource;

use crate::buffer::MessageBuffer;
use crate::codec::{parse_line, Line};
use crate::error::Result;
use crate::frame::Trace;
use crate::wheel::RotorWheel;

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Still accepting lines.
    Running,
    /// `END` was received.
    Terminated,
    /// The line source ran dry before `END`.
    Exhausted,
}

impl SessionState {
    /// Returns true once no further lines will be processed.
    pub fn is_finished(self) -> bool {
        !matches!(self, SessionState::Running)
    }

    /// Lowercase name, as used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Running => "running",
            SessionState::Terminated => "terminated",
            SessionState::Exhausted => "exhausted",
        }
    }
}

/// Line counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Lines taken from the source, `END` included.
    pub lines_read: u64,
    /// LOAD and MAP frames applied.
    pub frames_applied: u64,
    /// Lines that matched no frame type.
    pub lines_ignored: u64,
}

/// One decoding run: a wheel, a message buffer, and the dispatch loop.
#[derive(Debug)]
pub struct Session {
    wheel: RotorWheel,
    buffer: MessageBuffer,
    state: SessionState,
    stats: SessionStats,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session: unrotated wheel, empty buffer.
    pub fn new() -> Self {
        Self {
            wheel: RotorWheel::new(),
            buffer: MessageBuffer::new(),
            state: SessionState::Running,
            stats: SessionStats::default(),
        }
    }

    /// Classify and apply one line.
    ///
    /// Returns the trace of the applied frame, or `None` for `END`, ignored
    /// lines, and anything arriving after the session finished.
    pub fn process_line(&mut self, line: &str) -> Result<Option<Trace>> {
        if self.state.is_finished() {
            tracing::debug!(line, state = self.state.as_str(), "line after session end dropped");
            return Ok(None);
        }
        self.stats.lines_read += 1;

        match parse_line(line) {
            Line::Frame(frame) => {
                let trace = frame.apply(&mut self.wheel, &mut self.buffer)?;
                self.stats.frames_applied += 1;
                Ok(Some(trace))
            }
            Line::End => {
                self.state = SessionState::Terminated;
                tracing::debug!("end of transmission");
                Ok(None)
            }
            Line::Ignored => {
                self.stats.lines_ignored += 1;
                tracing::debug!(line, "unrecognised line ignored");
                Ok(None)
            }
        }
    }

    /// Drain `source` until `END` or end-of-stream.
    pub fn run<S: LineSource>(&mut self, source: &mut S) -> Result<SessionState> {
        let running = AtomicBool::new(true);
        self.run_with(source, &running, |_| {})
    }

    /// Drain `source` until `END`, end-of-stream, or `running` turns false.
    ///
    /// `running` is checked before every line request. When it stops the
    /// loop, the state stays [`SessionState::Running`]. `on_trace` sees every
    /// applied frame in order.
    pub fn run_with<S, F>(
        &mut self,
        source: &mut S,
        running: &AtomicBool,
        mut on_trace: F,
    ) -> Result<SessionState>
    where
        S: LineSource,
        F: FnMut(&Trace),
    {
        while !self.state.is_finished() && running.load(Ordering::SeqCst) {
            let Some(line) = source.next_line()? else {
                self.state = SessionState::Exhausted;
                break;
            };
            if let Some(trace) = self.process_line(&line)? {
                on_trace(&trace);
            }
        }

        tracing::info!(
            state = self.state.as_str(),
            lines_read = self.stats.lines_read,
            frames_applied = self.stats.frames_applied,
            lines_ignored = self.stats.lines_ignored,
            "session stopped"
        );
        Ok(self.state)
    }

    /// Current stop condition.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Line counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Borrow the rotor wheel.
    pub fn wheel(&self) -> &RotorWheel {
        &self.wheel
    }

    /// Borrow the message buffer.
    pub fn buffer(&self) -> &MessageBuffer {
        &self.buffer
    }

    /// The message decoded so far.
    pub fn message(&self) -> String {
        self.buffer.render()
    }

    /// Finish the session and return the decoded message.
    pub fn into_message(self) -> String {
        self.buffer.render()
    }
}
