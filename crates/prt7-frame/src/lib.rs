//! PRT-7 frame parsing, rotor-wheel decoding and session dispatch.
//!
//! PRT-7 is a line-oriented protocol with two frame types:
//! - `L,<char>` loads one character, which is decoded through the rotor wheel
//!   and appended to the message buffer (`L,Space` carries a space)
//! - `M,<int>` rotates the wheel forward (positive) or backward (negative)
//!
//! `END` closes the session. Anything else is ignored.
//!
//! This is a toy substitution wheel, not encryption.

pub mod buffer;
pub mod codec;
pub mod error;
pub mod frame;
pub mod session;
pub mod wheel;

pub use buffer::MessageBuffer;
pub use codec::{encode_end, encode_frame, encode_message, parse_line, Line, END_MARKER};
pub use error::{FrameError, Result};
pub use frame::{Frame, Trace};
pub use session::{Session, SessionState, SessionStats};
pub use wheel::{RotorWheel, ALPHABET, WHEEL_SIZE};
