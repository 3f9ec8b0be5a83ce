use bender_frame::{FrameError, RawLine};

/// A field that failed to parse while extracting a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    /// Non-numeric (or out of range) text where a number is expected.
    #[error("invalid {kind} field `{field}`: {value:?}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        value: String,
    },
}

/// Why a unit of input was discarded by the decoder.
///
/// Every variant is recoverable: the decoder drops the offending line (or the
/// overflowing bytes) and carries on with the next one.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The framer gave up on an over-long line.
    #[error("framing error: {0}")]
    Framing(FrameError),

    /// The line has no delimiter or its checksum does not match.
    #[error("checksum validation failed ({source}): {line}")]
    Checksum {
        line: RawLine,
        #[source]
        source: FrameError,
    },

    /// The line validated but a field could not be parsed.
    #[error("field parse failed ({source}): {line}")]
    Field {
        line: RawLine,
        #[source]
        source: ReportError,
    },
}

impl DecodeError {
    /// The discarded line, if a complete line was framed.
    pub fn line(&self) -> Option<&RawLine> {
        match self {
            DecodeError::Framing(_) => None,
            DecodeError::Checksum { line, .. } | DecodeError::Field { line, .. } => Some(line),
        }
    }
}
