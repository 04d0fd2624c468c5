use prt7_transport::TransportError;

/// Errors that can end a decoding session.
///
/// Malformed lines are not errors: they are ignored by the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The line source failed.
    #[error("line source error: {0}")]
    Transport(#[from] TransportError),

    /// The message buffer could not grow.
    #[error("out of memory while growing the message buffer")]
    OutOfMemory,
}

pub type Result<T> = std::result::Result<T, FrameError>;
