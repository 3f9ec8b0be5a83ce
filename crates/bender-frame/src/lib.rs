//! Line framing and checksum validation for the Bender serial protocol.
//!
//! Every frame on the wire is a single text line:
//! - A body of space/tab separated fields
//! - A `*` delimiter
//! - Two uppercase hex digits: the byte sum of the body, modulo 256
//! - An optional CR, then a mandatory LF
//!
//! Bytes go in one at a time; validated, tokenized [`Message`]s come out.

pub mod checksum;
pub mod error;
pub mod framer;
pub mod kind;
pub mod message;
pub mod reader;
pub mod tokenizer;
pub mod writer;

pub use checksum::{checksum8, checksum_hex, validate, verify, CHECKSUM_LEN, DELIMITER};
pub use error::{FrameError, Result};
pub use framer::{FramerConfig, LineFramer, RawLine, DEFAULT_MAX_LINE_LEN};
pub use kind::{kind_name, ANALOG, FAULT, STATUS};
pub use message::Message;
pub use reader::LineReader;
pub use tokenizer::tokenize;
pub use writer::{encode_line, LineWriter, LINE_TERMINATOR};
