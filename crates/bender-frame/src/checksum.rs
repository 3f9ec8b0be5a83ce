//! CheckSum8 modulo 256.

use crate::error::{FrameError, Result};

/// Separates the body from the checksum trailer.
pub const DELIMITER: u8 = b'*';

/// Number of hex characters in the trailer.
pub const CHECKSUM_LEN: usize = 2;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Sum of all bytes in `body`, modulo 256.
pub fn checksum8(body: &[u8]) -> u8 {
    body.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// The checksum of `body` as two uppercase hex characters.
pub fn checksum_hex(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let sum = checksum8(body);
    [
        HEX_UPPER[usize::from(sum >> 4)],
        HEX_UPPER[usize::from(sum & 0x0F)],
    ]
}

/// Verify a complete line and split it into body and trailer.
///
/// The body is everything before the first `*`. Exactly the two characters
/// after it are compared against the computed checksum. Anything beyond them
/// (such as the NUL terminator some firmware revisions append) is ignored,
/// except another `*`: a line carries at most one delimiter.
pub fn verify(line: &[u8]) -> Result<(&[u8], [u8; CHECKSUM_LEN])> {
    let pos = line
        .iter()
        .position(|&b| b == DELIMITER)
        .ok_or(FrameError::MissingDelimiter)?;

    let body = &line[..pos];
    let rest = &line[pos + 1..];
    if rest.len() < CHECKSUM_LEN {
        return Err(FrameError::TruncatedChecksum { found: rest.len() });
    }

    let found = [rest[0], rest[1]];
    let expected = checksum_hex(body);
    if found != expected {
        return Err(FrameError::ChecksumMismatch {
            expected: String::from_utf8_lossy(&expected).into_owned(),
            found: String::from_utf8_lossy(&found).into_owned(),
        });
    }

    if let Some(extra) = rest[CHECKSUM_LEN..].iter().position(|&b| b == DELIMITER) {
        return Err(FrameError::ExtraDelimiter {
            offset: pos + 1 + CHECKSUM_LEN + extra,
        });
    }

    Ok((body, found))
}

/// True iff `line` carries a valid CheckSum8 trailer.
pub fn validate(line: &[u8]) -> bool {
    verify(line).is_ok()
}
