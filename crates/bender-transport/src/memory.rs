use bytes::{Buf, BytesMut};

use crate::error::Result;
use crate::traits::ByteSource;

/// In-memory byte source for simulation and tests.
///
/// Bytes pushed with [`MemorySource::push`] become available on the next
/// poll, so a test can interleave partial writes with decoder turns.
#[derive(Debug, Default)]
pub struct MemorySource {
    buf: BytesMut,
    closed: bool,
}

impl MemorySource {
    /// Create an empty, open source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source preloaded with `data`.
    pub fn from_bytes(data: impl AsRef<[u8]>) -> Self {
        let mut source = Self::new();
        source.push(data);
        source
    }

    /// Append bytes to the pending input.
    pub fn push(&mut self, data: impl AsRef<[u8]>) {
        self.buf.extend_from_slice(data.as_ref());
    }

    /// Mark the source as closed. Pending bytes remain readable.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Number of bytes not yet read.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

impl ByteSource for MemorySource {
    fn available(&mut self) -> Result<bool> {
        Ok(!self.buf.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buf.get_u8()))
    }

    fn is_closed(&self) -> bool {
        self.closed && self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_order() {
        let mut source = MemorySource::from_bytes(b"ab");
        assert!(source.available().unwrap());
        assert_eq!(source.read_byte().unwrap(), Some(b'a'));
        assert_eq!(source.read_byte().unwrap(), Some(b'b'));
        assert!(!source.available().unwrap());
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn push_after_drain() {
        let mut source = MemorySource::new();
        assert_eq!(source.read_byte().unwrap(), None);

        source.push(b"x");
        assert_eq!(source.pending(), 1);
        assert_eq!(source.read_byte().unwrap(), Some(b'x'));
    }

    #[test]
    fn closed_only_after_drain() {
        let mut source = MemorySource::from_bytes(b"z");
        source.close();
        assert!(!source.is_closed());

        source.read_byte().unwrap();
        assert!(source.is_closed());
    }

    #[test]
    fn works_through_mut_ref_and_box() {
        fn first_byte<S: ByteSource>(mut source: S) -> Option<u8> {
            source.read_byte().unwrap()
        }

        let mut source = MemorySource::from_bytes(b"pq");
        assert_eq!(first_byte(&mut source), Some(b'p'));

        let mut boxed: Box<dyn ByteSource> = Box::new(source);
        assert_eq!(boxed.read_byte().unwrap(), Some(b'q'));
    }
}
