use std::path::PathBuf;

/// Errors that can occur while reading lines from a source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the device or file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured maximum length without a terminator.
    #[error("line too long ({len} bytes, max {max})")]
    LineTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
