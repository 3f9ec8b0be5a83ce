//! Per-line diagnostics shared by every consumer of the decoder.
//!
//! Each condition gets its own message so a log reader can tell them apart:
//! checksum failure, field parse failure, unrecognized message, fault report
//! and (in [`Publisher`](crate::Publisher)) unregistered unit.

use tracing::{debug, warn};

use crate::decoder::Decoded;
use crate::error::DecodeError;
use crate::report::Report;

/// Log the diagnostics a decoded report calls for.
///
/// Status reports log nothing here; publishing is the caller's concern.
pub fn report(decoded: &Decoded) {
    match &decoded.report {
        Report::Status(_) => {}
        Report::Analog(analog) => {
            for (channel, raw) in analog.readings.iter().enumerate() {
                debug!(channel, raw, "analog input");
            }
        }
        Report::Fault(fault) => {
            warn!(line = %decoded.line, text = %fault.text, "fault message");
        }
        Report::Unrecognized(unrecognized) => {
            warn!(
                line = %decoded.line,
                keyword = unrecognized.keyword.as_deref().unwrap_or(""),
                tokens = unrecognized.token_count,
                "unhandled message type or not enough fields"
            );
        }
    }
}

/// Log why a line (or an over-long run of bytes) was discarded.
pub fn rejected(err: &DecodeError) {
    match err {
        DecodeError::Framing(source) => {
            warn!(error = %source, "discarding over-long line");
        }
        DecodeError::Checksum { line, source } => {
            warn!(%line, error = %source, "checksum validation failed");
        }
        DecodeError::Field { line, source } => {
            warn!(%line, error = %source, "field parse failed; message dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use bender_frame::RawLine;
    use tracing_test::traced_test;

    use super::*;
    use crate::decoder::decode_line;

    #[test]
    #[traced_test]
    fn fault_report_is_logged_with_text() {
        let decoded = decode_line(RawLine::from(
            "GFS BENDER 2: FLAT LINE LOW -- SHORT -- FAULT INDICATED  *02",
        ))
        .unwrap();
        report(&decoded);
        assert!(logs_contain("fault message"));
        assert!(logs_contain("FLAT LINE LOW"));
    }

    #[test]
    #[traced_test]
    fn unrecognized_report_is_logged_with_line() {
        let decoded = decode_line(RawLine::from("XYZ *2B")).unwrap();
        report(&decoded);
        assert!(logs_contain("unhandled message type or not enough fields"));
        assert!(logs_contain("XYZ *2B"));
    }

    #[test]
    #[traced_test]
    fn status_report_logs_nothing() {
        let decoded = decode_line(RawLine::from("BGF 0 1 100052 18496 184 6859 *BD")).unwrap();
        report(&decoded);
        assert!(!logs_contain("WARN"));
    }

    #[test]
    #[traced_test]
    fn checksum_failure_names_the_line() {
        let err = decode_line(RawLine::from("BGF 0 1 100052 18496 184 6859")).unwrap_err();
        rejected(&err);
        assert!(logs_contain("checksum validation failed"));
        assert!(logs_contain("BGF 0 1 100052 18496 184 6859"));
    }
}
