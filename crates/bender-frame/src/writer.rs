use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};

use crate::checksum::{checksum_hex, DELIMITER};
use crate::error::{FrameError, Result};

/// Terminator appended after the checksum trailer.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Encode a body into a complete wire line.
///
/// Wire format:
/// ```text
/// <body>*<CC>\r\n
/// ```
/// where `CC` is the CheckSum8 of `body` in uppercase hex. The body must not
/// contain `*`.
pub fn encode_line(body: &[u8], dst: &mut BytesMut) -> Result<()> {
    if let Some(offset) = body.iter().position(|&b| b == DELIMITER) {
        return Err(FrameError::DelimiterInBody { offset });
    }
    dst.reserve(body.len() + 3 + LINE_TERMINATOR.len());
    dst.put_slice(body);
    dst.put_u8(DELIMITER);
    dst.put_slice(&checksum_hex(body));
    dst.put_slice(LINE_TERMINATOR);
    Ok(())
}

/// Writes checksummed lines to any `Write` stream.
///
/// Used to replay captures and to simulate a feed for tests.
pub struct LineWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> LineWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(128),
        }
    }

    /// Encode and write one line (blocking).
    pub fn send(&mut self, body: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_line(body, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.inner.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::validate;
    use crate::framer::LineFramer;

    #[test]
    fn encodes_status_line() {
        let mut buf = BytesMut::new();
        encode_line(b"BGF 0 1 100052 18496 184 6859 ", &mut buf).unwrap();
        assert_eq!(&buf[..], b"BGF 0 1 100052 18496 184 6859 *BD\r\n");
    }

    #[test]
    fn rejects_delimiter_in_body() {
        let mut buf = BytesMut::new();
        let err = encode_line(b"GFS a*b", &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::DelimiterInBody { offset: 5 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn written_lines_frame_and_validate() {
        let mut writer = LineWriter::new(Vec::new());
        writer.send(b"AIN 4 0 0 0 0 ").unwrap();
        writer.send(b"GFS BENDER 2: FLAT LINE LOW ").unwrap();
        let wire = writer.into_inner();

        let mut framer = LineFramer::new();
        let lines: Vec<_> = framer.feed_slice(&wire).map(|r| r.unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| validate(l.as_bytes())));
        assert_eq!(lines[0].as_bytes(), b"AIN 4 0 0 0 0 *8C");
    }

    #[test]
    fn zero_write_is_connection_closed() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = LineWriter::new(Full);
        assert!(matches!(
            writer.send(b"GFS x "),
            Err(FrameError::ConnectionClosed)
        ));
    }
}
