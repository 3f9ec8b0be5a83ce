use bytes::Bytes;

use crate::checksum::{verify, CHECKSUM_LEN};
use crate::error::Result;
use crate::framer::RawLine;
use crate::tokenizer::tokenize;

/// A checksum-validated, tokenized line.
///
/// Only constructed through [`Message::parse`], so a `Message` always has a
/// verified trailer. The token list may be empty for a blank body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    raw_body: Bytes,
    checksum_trailer: [u8; CHECKSUM_LEN],
    tokens: Vec<String>,
}

impl Message {
    /// Validate the checksum of `line` and tokenize its body.
    ///
    /// Bodies that are not valid UTF-8 are decoded lossily; the checksum is
    /// always computed over the raw bytes.
    pub fn parse(line: &RawLine) -> Result<Self> {
        let (body, checksum_trailer) = verify(line.as_bytes())?;
        let raw_body = line.bytes().slice(..body.len());
        let text = String::from_utf8_lossy(&raw_body);
        let tokens = tokenize(&text).into_iter().map(str::to_owned).collect();

        Ok(Self {
            raw_body,
            checksum_trailer,
            tokens,
        })
    }

    /// Bytes before the checksum delimiter.
    pub fn raw_body(&self) -> &[u8] {
        &self.raw_body
    }

    /// The two hex characters after the delimiter.
    pub fn checksum_trailer(&self) -> &str {
        // Always ASCII hex: verify() compared it against checksum_hex().
        std::str::from_utf8(&self.checksum_trailer).unwrap_or_default()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// The first token, which selects the message kind.
    pub fn keyword(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    #[test]
    fn parses_status_line() {
        let line = RawLine::from("BGF 0 1 100052 18496 184 6859 *BD");
        let msg = Message::parse(&line).unwrap();

        assert_eq!(msg.raw_body(), b"BGF 0 1 100052 18496 184 6859 ");
        assert_eq!(msg.checksum_trailer(), "BD");
        assert_eq!(msg.keyword(), Some("BGF"));
        assert_eq!(
            msg.tokens(),
            &["BGF", "0", "1", "100052", "18496", "184", "6859"]
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        let line = RawLine::from("BGF 0 1 100052 18496 184 6859 *BC");
        let err = Message::parse(&line).unwrap_err();
        assert!(matches!(err, FrameError::ChecksumMismatch { .. }));
    }

    #[test]
    fn rejects_missing_delimiter() {
        let line = RawLine::from("BGF 0 1 100052 18496 184 6859");
        assert!(matches!(
            Message::parse(&line),
            Err(FrameError::MissingDelimiter)
        ));
    }

    #[test]
    fn rejects_second_delimiter() {
        assert!(matches!(
            Message::parse(&RawLine::from("X*58*")),
            Err(FrameError::ExtraDelimiter { .. })
        ));
    }

    #[test]
    fn blank_body_has_no_keyword() {
        let msg = Message::parse(&RawLine::from("  *40")).unwrap();
        assert!(msg.tokens().is_empty());
        assert_eq!(msg.keyword(), None);
    }

    #[test]
    fn non_utf8_body_is_lossy() {
        let mut body = b"GFS \xff".to_vec();
        let trailer = crate::checksum::checksum_hex(&body);
        body.push(b'*');
        body.extend_from_slice(&trailer);

        let msg = Message::parse(&RawLine::new(body)).unwrap();
        assert_eq!(msg.tokens(), &["GFS", "\u{fffd}"]);
    }
}
