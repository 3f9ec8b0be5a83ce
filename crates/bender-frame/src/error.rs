/// Errors that can occur while framing or validating a line.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The line contains no `*` checksum delimiter.
    #[error("missing checksum delimiter '*'")]
    MissingDelimiter,

    /// Fewer than two characters follow the delimiter.
    #[error("checksum trailer too short ({found} of 2 characters)")]
    TruncatedChecksum { found: usize },

    /// The trailer does not match the computed CheckSum8.
    #[error("checksum mismatch (expected {expected}, found {found})")]
    ChecksumMismatch { expected: String, found: String },

    /// A second `*` follows the checksum trailer.
    #[error("extra checksum delimiter '*' at offset {offset}")]
    ExtraDelimiter { offset: usize },

    /// The accumulated line exceeded the configured maximum length.
    #[error("line exceeded {max} bytes without a line feed")]
    LineTooLong { max: usize },

    /// A body passed to the encoder contains the checksum delimiter.
    #[error("body contains checksum delimiter '*' at offset {offset}")]
    DelimiterInBody { offset: usize },

    /// An I/O error occurred while reading or writing lines.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another complete line was received.
    #[error("connection closed (no further complete line)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
