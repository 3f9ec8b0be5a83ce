use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use tracing::debug;

use crate::error::{FrameError, Result};
use crate::framer::{FramerConfig, LineFramer, RawLine};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads complete lines from any blocking `Read` stream.
///
/// Used for captured logs and pipes where blocking is fine. Live feeds go
/// through a `ByteSource` and the monitor instead.
pub struct LineReader<T> {
    inner: T,
    framer: LineFramer,
    ready: VecDeque<Result<RawLine>>,
    eof: bool,
}

impl<T: Read> LineReader<T> {
    /// Create a line reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FramerConfig::default())
    }

    /// Create a line reader with explicit framer configuration.
    pub fn with_config(inner: T, config: FramerConfig) -> Self {
        Self {
            inner,
            framer: LineFramer::with_config(config),
            ready: VecDeque::new(),
            eof: false,
        }
    }

    /// Read the next complete line (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` once the stream is exhausted.
    /// A trailing line without LF is not a frame and is dropped.
    pub fn read_line(&mut self) -> Result<RawLine> {
        loop {
            if let Some(next) = self.ready.pop_front() {
                return next;
            }
            if self.eof {
                return Err(FrameError::ConnectionClosed);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                self.eof = true;
                if self.framer.pending() > 0 {
                    debug!(
                        pending = self.framer.pending(),
                        "dropping unterminated trailing line"
                    );
                    self.framer.reset();
                }
                continue;
            }

            self.ready.extend(self.framer.feed_slice(&chunk[..read]));
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for LineReader<T> {
    type Item = Result<RawLine>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_line() {
            Err(FrameError::ConnectionClosed) => None,
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn read_multiple_lines() {
        let wire = b"BGF 2 0 0 0 0 0 *D1\r\nAIN 4 0 0 0 0 *8C\r\n".to_vec();
        let mut reader = LineReader::new(Cursor::new(wire));

        assert_eq!(reader.read_line().unwrap().as_bytes(), b"BGF 2 0 0 0 0 0 *D1");
        assert_eq!(reader.read_line().unwrap().as_bytes(), b"AIN 4 0 0 0 0 *8C");
        assert!(matches!(
            reader.read_line(),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn partial_read_handling() {
        let reader = ByteByByteReader {
            bytes: b"AIN 4 0 0 0 0 *8C\n".to_vec(),
            pos: 0,
        };
        let mut reader = LineReader::new(reader);
        assert_eq!(reader.read_line().unwrap().as_bytes(), b"AIN 4 0 0 0 0 *8C");
    }

    #[test]
    fn trailing_partial_line_is_dropped() {
        let mut reader = LineReader::new(Cursor::new(b"one\ntwo".to_vec()));
        let lines: Vec<_> = reader.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(lines, vec![RawLine::from("one")]);
    }

    #[test]
    fn empty_stream_is_closed() {
        let mut reader = LineReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(matches!(
            reader.read_line(),
            Err(FrameError::ConnectionClosed)
        ));
    }

    #[test]
    fn overflow_is_reported_in_order() {
        let cfg = FramerConfig {
            max_line_len: Some(8),
        };
        let wire = b"first\nxxxxxxxxxxxxxxxx\nlast\n".to_vec();
        let results: Vec<_> = LineReader::with_config(Cursor::new(wire), cfg).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().as_bytes(), b"first");
        assert!(matches!(results[1], Err(FrameError::LineTooLong { max: 8 })));
        assert_eq!(results[2].as_ref().unwrap().as_bytes(), b"last");
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(b"GFS ok *00\n".to_vec()),
        };
        let mut reader = LineReader::new(reader);
        assert_eq!(reader.read_line().unwrap().as_bytes(), b"GFS ok *00");
    }

    #[test]
    fn io_error_propagates() {
        let mut reader = LineReader::new(FailingReader);
        let err = reader.read_line().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }
}
