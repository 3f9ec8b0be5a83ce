use std::io::{ErrorKind, Read};
use std::os::fd::AsRawFd;

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::ByteSource;

const READ_CHUNK_SIZE: usize = 256;

/// Byte source over any readable file descriptor.
///
/// Readiness is checked with a zero-timeout `poll(2)`, so `available()` never
/// blocks even when the descriptor itself is in blocking mode. Bytes read from
/// the descriptor are held in a small buffer and handed out one at a time.
pub struct FdSource<T> {
    inner: T,
    buf: BytesMut,
    closed: bool,
}

impl<T: Read + AsRawFd> FdSource<T> {
    /// Wrap a readable descriptor.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            closed: false,
        }
    }

    /// Borrow the underlying descriptor.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the source and return the inner descriptor.
    ///
    /// Buffered but unread bytes are lost.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn readable(&self) -> Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.inner.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        // SAFETY: `pfd` is a valid, writable pollfd and we pass a count of 1.
        // A zero timeout makes the call return immediately.
        let rc = unsafe { libc::poll(&mut pfd, 1, 0) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(TransportError::Poll(err));
        }

        let ready = libc::POLLIN | libc::POLLHUP | libc::POLLERR;
        Ok(rc > 0 && (pfd.revents & ready) != 0)
    }

    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        match self.inner.read(&mut chunk) {
            Ok(0) => {
                debug!("byte source reached end of input");
                self.closed = true;
            }
            Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
            Err(err) if matches!(err.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {}
            Err(err) => return Err(TransportError::Io(err)),
        }
        Ok(())
    }
}

impl<T: Read + AsRawFd> ByteSource for FdSource<T> {
    fn available(&mut self) -> Result<bool> {
        if !self.buf.is_empty() {
            return Ok(true);
        }
        if self.closed {
            return Ok(false);
        }
        if self.readable()? {
            self.fill()?;
        }
        Ok(!self.buf.is_empty())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if !self.available()? {
            return Ok(None);
        }
        Ok(Some(self.buf.get_u8()))
    }

    fn is_closed(&self) -> bool {
        self.closed && self.buf.is_empty()
    }
}

impl<T> std::fmt::Debug for FdSource<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdSource")
            .field("buffered", &self.buf.len())
            .field("closed", &self.closed)
            .finish()
    }
}
