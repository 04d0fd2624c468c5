//! PRT-7 serial protocol decoder.
//!
//! A PRT-7 transmitter sends `L,<char>` frames carrying enciphered
//! characters and `M,<int>` frames that turn a 26-symbol rotor wheel. The
//! receiver decodes every loaded character through the wheel as it stands
//! and assembles the hidden message until `END`.
//!
//! # Crate Structure
//!
//! - [`transport`] — Line sources (devices, files, stdin, scripted lines)
//! - [`frame`] — Rotor wheel, message buffer, frame parsing and sessions
//!
//! ```
//! use prt7::frame::Session;
//!
//! let mut source = vec!["M,1".to_string(), "L,G".to_string(), "L,h".to_string(), "END".to_string()]
//!     .into_iter();
//! let mut session = Session::new();
//! session.run(&mut source).unwrap();
//! assert_eq!(session.message(), "HI");
//! ```

/// Re-export transport types.
pub mod transport {
    pub use prt7_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use prt7_frame::*;
}
