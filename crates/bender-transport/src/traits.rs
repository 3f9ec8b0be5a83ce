use crate::error::Result;

/// A pollable, non-blocking source of raw serial bytes.
///
/// Mirrors the two operations a UART peripheral exposes: "is data available"
/// and "read next byte". Neither call may block. A source that has reached
/// end of input reports `available() == false` and `is_closed() == true`.
pub trait ByteSource {
    /// Returns true if at least one byte can be read without blocking.
    fn available(&mut self) -> Result<bool>;

    /// Read the next byte, or `None` if nothing is available right now.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// True once the source can never produce more bytes (EOF, hangup).
    fn is_closed(&self) -> bool {
        false
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn available(&mut self) -> Result<bool> {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn available(&mut self) -> Result<bool> {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}
