use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Default maximum line length in bytes.
///
/// Real reports are well under 100 bytes; anything this long is line noise
/// or a feed that lost its terminators.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Configuration for the line framer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    /// Maximum bytes accumulated before a forced reset. `None` means unbounded.
    pub max_line_len: Option<usize>,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_line_len: Some(DEFAULT_MAX_LINE_LEN),
        }
    }
}

/// One complete candidate line, with CR and LF removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawLine(Bytes);

impl RawLine {
    /// Wrap already-framed bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Shared handle to the underlying buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RawLine {
    fn from(s: &str) -> Self {
        Self(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<&[u8]> for RawLine {
    fn from(b: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(b))
    }
}

impl std::fmt::Display for RawLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}

/// Splits an unbounded byte stream into lines.
///
/// State persists across calls, so bytes may arrive one at a time over many
/// scheduler turns. The framer does not look at line content: only LF ends a
/// line, CR is dropped, and every other byte (NUL and control bytes included)
/// is kept verbatim.
#[derive(Debug)]
pub struct LineFramer {
    buf: BytesMut,
    config: FramerConfig,
    discarding: bool,
}

impl LineFramer {
    /// Create a framer with default configuration.
    pub fn new() -> Self {
        Self::with_config(FramerConfig::default())
    }

    /// Create a framer with explicit configuration.
    pub fn with_config(config: FramerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(128),
            config,
            discarding: false,
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(Some(line))` when an LF completes a non-empty line. An LF
    /// with nothing accumulated is dropped silently. When the line grows past
    /// `max_line_len`, the accumulated bytes are dropped, `LineTooLong` is
    /// returned once, and input is ignored up to the next LF.
    pub fn feed(&mut self, byte: u8) -> Result<Option<RawLine>> {
        match byte {
            LF => {
                if self.discarding {
                    self.discarding = false;
                    return Ok(None);
                }
                if self.buf.is_empty() {
                    return Ok(None);
                }
                let line = RawLine(self.buf.split().freeze());
                trace!(len = line.len(), "framed line");
                Ok(Some(line))
            }
            CR => Ok(None),
            _ if self.discarding => Ok(None),
            _ => {
                if let Some(max) = self.config.max_line_len {
                    if self.buf.len() >= max {
                        self.buf.clear();
                        self.discarding = true;
                        return Err(FrameError::LineTooLong { max });
                    }
                }
                self.buf.put_u8(byte);
                Ok(None)
            }
        }
    }

    /// Feed a slice, yielding every completed line or overflow in order.
    pub fn feed_slice<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Iterator<Item = Result<RawLine>> + 'a {
        bytes.iter().filter_map(move |&b| self.feed(b).transpose())
    }

    /// Drop any partial line and leave discard mode.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.discarding = false;
    }

    /// Bytes accumulated toward the current line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Current framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}
