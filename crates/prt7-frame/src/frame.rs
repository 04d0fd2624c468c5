use std::fmt;

use crate::buffer::MessageBuffer;
use crate::error::Result;
use crate::wheel::RotorWheel;

/// One unit of PRT-7 work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Decode one character through the wheel and append it to the message.
    Load(char),
    /// Rotate the wheel; positive is forward, negative backward.
    Map(i64),
}

impl Frame {
    /// Apply the frame to the session state and describe what happened.
    pub fn apply(&self, wheel: &mut RotorWheel, buffer: &mut MessageBuffer) -> Result<Trace> {
        let trace = match *self {
            Frame::Load(original) => {
                let decoded = wheel.map_symbol(original);
                buffer.append(decoded)?;
                Trace::Load {
                    original,
                    decoded,
                    progress: buffer.render_bracketed(),
                }
            }
            Frame::Map(rotation) => {
                wheel.rotate(rotation);
                Trace::Map {
                    rotation,
                    reference: wheel.reference(),
                }
            }
        };
        tracing::debug!(frame = %self, trace = %trace, "frame applied");
        Ok(trace)
    }
}

/// Wire representation, without the line terminator.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Load(' ') => f.write_str("L,Space"),
            Frame::Load(c) => write!(f, "L,{c}"),
            Frame::Map(n) => write!(f, "M,{n}"),
        }
    }
}

/// Human-readable record of one applied frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trace {
    Load {
        original: char,
        decoded: char,
        /// Message so far, bracketed.
        progress: String,
    },
    Map {
        rotation: i64,
        /// Reference symbol after the rotation.
        reference: char,
    },
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trace::Load {
                original,
                decoded,
                progress,
            } => write!(
                f,
                "LOAD '{original}' -> '{decoded}' | message: {progress}"
            ),
            Trace::Map {
                rotation,
                reference,
            } => write!(f, "MAP {rotation:+} | reference: '{reference}'"),
        }
    }
}
