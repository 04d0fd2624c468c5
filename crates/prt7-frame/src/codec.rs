use bytes::{BufMut, BytesMut};

use crate::frame::Frame;
use crate::wheel::RotorWheel;

/// Prefix of a LOAD frame.
pub const LOAD_PREFIX: &str = "L,";

/// Prefix of a MAP frame.
pub const MAP_PREFIX: &str = "M,";

/// Session terminator.
pub const END_MARKER: &str = "END";

/// LOAD payload spelling for a literal space.
pub const SPACE_TOKEN: &str = "Space";

/// Classification of one raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    /// A frame to apply.
    Frame(Frame),
    /// The session terminator.
    End,
    /// Not a PRT-7 frame. Dropped without error.
    Ignored,
}

/// Classify one line (terminator already stripped).
///
/// Prefixes are checked in order: `L,`, `M,`, then `END`.
///
/// - `L,` takes the next character as payload, except that `L,Space`
///   carries `' '`. A bare `L,` is ignored.
/// - `M,` reads an optional `-` and the leading run of decimal digits;
///   trailing text is ignored and a missing digit run means `0`.
/// - Any line starting with `END` ends the session.
pub fn parse_line(line: &str) -> Line {
    if let Some(rest) = line.strip_prefix(LOAD_PREFIX) {
        return match parse_load(rest) {
            Some(c) => Line::Frame(Frame::Load(c)),
            None => Line::Ignored,
        };
    }
    if let Some(rest) = line.strip_prefix(MAP_PREFIX) {
        return Line::Frame(Frame::Map(parse_rotation(rest)));
    }
    if line.starts_with(END_MARKER) {
        return Line::End;
    }
    Line::Ignored
}

fn parse_load(rest: &str) -> Option<char> {
    if rest.starts_with(SPACE_TOKEN) {
        return Some(' ');
    }
    rest.chars().next()
}

// Saturates at the i64 bounds; the wheel only sees the value modulo 26.
fn parse_rotation(rest: &str) -> i64 {
    let (negative, digits) = match rest.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, rest),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });

    if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    }
}

/// Encode a frame as one wire line, `\n` terminated.
pub fn encode_frame(frame: &Frame, dst: &mut BytesMut) {
    let text = frame.to_string();
    dst.reserve(text.len() + 1);
    dst.put_slice(text.as_bytes());
    dst.put_u8(b'\n');
}

/// Encode the session terminator.
pub fn encode_end(dst: &mut BytesMut) {
    dst.reserve(END_MARKER.len() + 1);
    dst.put_slice(END_MARKER.as_bytes());
    dst.put_u8(b'\n');
}

/// Encode a whole transmission that decodes to `text`, uppercased.
///
/// Emits `M,<rotation>`, one LOAD frame per character with letters run
/// backwards through the wheel, then `END`. Line breaks in `text` cannot
/// be carried by a LOAD frame and are skipped.
pub fn encode_message(text: &str, rotation: i64, dst: &mut BytesMut) {
    let mut wheel = RotorWheel::new();
    let map = Frame::Map(rotation);
    wheel.rotate(rotation);
    encode_frame(&map, dst);

    for c in text.chars().filter(|c| !matches!(c, '\n' | '\r')) {
        encode_frame(&Frame::Load(wheel.unmap_symbol(c)), dst);
    }
    encode_end(dst);
}
