use bender_frame::{FramerConfig, LineFramer, Message, RawLine};

use crate::error::DecodeError;
use crate::report::{classify, Report};

/// A report together with the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub line: RawLine,
    pub report: Report,
}

/// Validate, tokenize and classify one framed line.
pub fn decode_line(line: RawLine) -> Result<Decoded, DecodeError> {
    let message = match Message::parse(&line) {
        Ok(message) => message,
        Err(source) => return Err(DecodeError::Checksum { line, source }),
    };

    match classify(message.tokens()) {
        Ok(report) => Ok(Decoded { line, report }),
        Err(source) => Err(DecodeError::Field { line, source }),
    }
}

/// The byte-to-report pipeline, without I/O.
///
/// framer → checksum → tokenizer → classifier. Feed bytes in any chunking;
/// the sequence of results is the same.
#[derive(Debug, Default)]
pub struct Decoder {
    framer: LineFramer,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            framer: LineFramer::with_config(config),
        }
    }

    /// Feed one byte; returns a result whenever a line completes or overflows.
    pub fn feed(&mut self, byte: u8) -> Option<Result<Decoded, DecodeError>> {
        match self.framer.feed(byte) {
            Ok(None) => None,
            Ok(Some(line)) => Some(decode_line(line)),
            Err(err) => Some(Err(DecodeError::Framing(err))),
        }
    }

    /// Feed a slice, yielding results in arrival order.
    pub fn feed_slice<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Iterator<Item = Result<Decoded, DecodeError>> + 'a {
        bytes.iter().filter_map(move |&b| self.feed(b))
    }

    /// Drop any partially received line.
    pub fn reset(&mut self) {
        self.framer.reset();
    }

    /// Bytes accumulated toward the current line.
    pub fn pending(&self) -> usize {
        self.framer.pending()
    }
}

#[cfg(test)]
mod tests {
    use bender_frame::FrameError;
    use bytes::BytesMut;
    use proptest::prelude::*;

    use super::*;
    use crate::error::ReportError;
    use crate::report::{FaultReport, StatusReport};

    const BLOCK: &[u8] = b"BGF 0 1 100052 18500 184 6859 *AF\r\n\
BGF 1 1 100056 13508 135 11505 *D3\r\n\
BGF 2 0 0 0 0 0 *D1\r\n\
GFS BENDER 2: FLAT LINE LOW -- SHORT -- FAULT INDICATED  *02\r\n\
AIN 4 0 0 0 0 *8C\r\n";

    fn kinds(results: &[Result<Decoded, DecodeError>]) -> Vec<&'static str> {
        results
            .iter()
            .map(|r| match r {
                Ok(d) => d.report.kind(),
                Err(_) => "error",
            })
            .collect()
    }

    #[test]
    fn decodes_sample_block() {
        let mut decoder = Decoder::new();
        let results: Vec<_> = decoder.feed_slice(BLOCK).collect();
        assert_eq!(
            kinds(&results),
            vec!["status", "status", "status", "fault", "analog"]
        );

        let Ok(Decoded {
            report: Report::Fault(FaultReport { text }),
            ..
        }) = &results[3]
        else {
            panic!("expected fault report");
        };
        assert_eq!(text, "BENDER 2: FLAT LINE LOW -- SHORT -- FAULT INDICATED");
    }

    #[test]
    fn decode_line_keeps_raw_line() {
        let decoded = decode_line(RawLine::from("BGF 0 1 100052 18496 184 6859 *BD")).unwrap();
        assert_eq!(decoded.line.as_bytes(), b"BGF 0 1 100052 18496 184 6859 *BD");
        assert!(matches!(
            decoded.report,
            Report::Status(StatusReport { unit_id: 0, status: 1, .. })
        ));
    }

    #[test]
    fn bad_checksum_is_rejected_and_decoding_continues() {
        let mut decoder = Decoder::new();
        let results: Vec<_> = decoder
            .feed_slice(b"BGF 0 1 100052 18496 184 6859 *BC\nAIN 4 0 0 0 0 *8C\n")
            .collect();

        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(DecodeError::Checksum { line, source }) => {
                assert_eq!(line.as_bytes(), b"BGF 0 1 100052 18496 184 6859 *BC");
                assert!(matches!(source, FrameError::ChecksumMismatch { .. }));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(kinds(&results[1..]), vec!["analog"]);
    }

    #[test]
    fn missing_delimiter_is_rejected() {
        let mut decoder = Decoder::new();
        let results: Vec<_> = decoder.feed_slice(b"BGF 0 1 100052 18496 184 6859\n").collect();
        assert!(matches!(
            results.as_slice(),
            [Err(DecodeError::Checksum {
                source: FrameError::MissingDelimiter,
                ..
            })]
        ));
    }

    #[test]
    fn field_error_carries_line() {
        let mut wire = BytesMut::new();
        bender_frame::encode_line(b"BGF 0 x 100052 18496 184 6859 ", &mut wire).unwrap();

        let mut decoder = Decoder::new();
        let results: Vec<_> = decoder.feed_slice(&wire).collect();
        match &results[..] {
            [Err(err @ DecodeError::Field { source, .. })] => {
                assert!(matches!(
                    source,
                    ReportError::InvalidField { field: "status", .. }
                ));
                assert!(err.line().is_some());
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn empty_lines_produce_nothing() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed_slice(b"\r\n\n\r\n").count(), 0);
    }

    #[test]
    fn overflow_surfaces_as_framing_error() {
        let mut decoder = Decoder::with_config(FramerConfig {
            max_line_len: Some(20),
        });
        let mut wire = vec![b'A'; 40];
        wire.extend_from_slice(b"\nAIN 4 0 0 0 0 *8C\n");

        let results: Vec<_> = decoder.feed_slice(&wire).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            Err(DecodeError::Framing(FrameError::LineTooLong { max: 20 }))
        ));
        assert!(results[0].as_ref().unwrap_err().line().is_none());
        assert_eq!(kinds(&results[1..]), vec!["analog"]);
    }

    #[test]
    fn reset_drops_partial_line() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed_slice(b"BGF 0 1 1").count(), 0);
        assert_eq!(decoder.pending(), 9);
        decoder.reset();
        assert_eq!(decoder.pending(), 0);
        assert_eq!(kinds(&decoder.feed_slice(b"AIN 4 0 0 0 0 *8C\n").collect::<Vec<_>>()), vec!["analog"]);
    }

    fn outcome(r: Result<Decoded, DecodeError>) -> Result<Decoded, String> {
        r.map_err(|e| e.to_string())
    }

    proptest! {
        #[test]
        fn prop_one_byte_at_a_time_matches_all_at_once(
            noise in proptest::collection::vec(any::<u8>(), 0..64),
            split in 0usize..512,
        ) {
            let mut wire = BLOCK.to_vec();
            wire.extend_from_slice(&noise);
            wire.extend_from_slice(BLOCK);
            let split = split.min(wire.len());

            let mut whole = Decoder::new();
            let expected: Vec<_> = whole.feed_slice(&wire).map(outcome).collect();

            let mut bytewise = Decoder::new();
            let mut actual = Vec::new();
            for &b in &wire[..split] {
                actual.extend(bytewise.feed(b).map(outcome));
            }
            actual.extend(bytewise.feed_slice(&wire[split..]).map(outcome));

            prop_assert_eq!(expected, actual);
        }
    }
}
