use std::path::PathBuf;

/// Errors that can occur while polling a byte source.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to open the specified device or file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to connect to a serial bridge socket.
    #[error("failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Readiness polling failed.
    #[error("poll failed: {0}")]
    Poll(std::io::Error),

    /// An I/O error occurred while reading from the source.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The socket path is too long for the platform.
    #[error("socket path too long ({len} bytes, max {max}): {path}")]
    PathTooLong {
        path: PathBuf,
        len: usize,
        max: usize,
    },
}

pub type Result<T> = std::result::Result<T, TransportError>;
