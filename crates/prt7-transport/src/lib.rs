//! Line source abstraction for the PRT-7 protocol.
//!
//! The decoder core never touches raw bytes. It asks a [`LineSource`] for the
//! next complete text line and gets either a line (terminator stripped) or
//! end-of-stream. This crate provides:
//! - [`LineReader`], a buffered line splitter over any `std::io::Read`
//! - [`open_device`], for serial device nodes and capture files
//!
//! Port configuration (baud rate, parity) is left to the operator.

pub mod error;
pub mod reader;
pub mod traits;

pub use error::{Result, TransportError};
pub use reader::{open_device, LineConfig, LineReader, DEFAULT_IDLE_BACKOFF, DEFAULT_MAX_LINE_LEN};
pub use traits::LineSource;
