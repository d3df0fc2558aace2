//! Checksummed framing for on-disk files
//!
//! ```text
//! ┌────────┬──────────┬──────────┬─────────────┐
//! │ magic  │ crc32 LE │ len LE   │ payload     │
//! │ 4 B    │ 4 B      │ 4 B      │ len bytes   │
//! └────────┴──────────┴──────────┴─────────────┘
//! ```
//!
//! The CRC covers the payload only. A wrong magic, short file, length
//! mismatch or CRC mismatch all decode as [`FrameError`].

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

/// Magic for document files
pub const DOC_MAGIC: [u8; 4] = *b"GVD1";

/// Magic for pending-batch journal records
pub const JOURNAL_MAGIC: [u8; 4] = *b"GVJ1";

const HEADER_LEN: usize = 12;

/// Why a frame failed to decode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Fewer bytes than the header or declared length
    #[error("truncated frame: need {needed} bytes, have {have}")]
    Truncated {
        /// Bytes needed
        needed: usize,
        /// Bytes present
        have: usize,
    },
    /// Magic bytes do not match the expected file kind
    #[error("bad magic")]
    BadMagic,
    /// Payload checksum mismatch
    #[error("checksum mismatch: expected {expected:08x}, got {actual:08x}")]
    ChecksumMismatch {
        /// Checksum stored in the header
        expected: u32,
        /// Checksum of the payload read
        actual: u32,
    },
}

/// Wrap `payload` in a frame
pub fn encode_frame(magic: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; HEADER_LEN + payload.len()];
    out[..4].copy_from_slice(&magic);
    LittleEndian::write_u32(&mut out[4..8], crc32fast::hash(payload));
    LittleEndian::write_u32(&mut out[8..12], payload.len() as u32);
    out[HEADER_LEN..].copy_from_slice(payload);
    out
}

/// Validate a frame and return its payload
pub fn decode_frame(magic: [u8; 4], bytes: &[u8]) -> Result<&[u8], FrameError> {
    if bytes.len() < HEADER_LEN {
        return Err(FrameError::Truncated {
            needed: HEADER_LEN,
            have: bytes.len(),
        });
    }
    if bytes[..4] != magic {
        return Err(FrameError::BadMagic);
    }
    let expected = LittleEndian::read_u32(&bytes[4..8]);
    let len = LittleEndian::read_u32(&bytes[8..12]) as usize;

    let end = HEADER_LEN + len;
    if bytes.len() < end {
        return Err(FrameError::Truncated {
            needed: end,
            have: bytes.len(),
        });
    }
    let payload = &bytes[HEADER_LEN..end];
    let actual = crc32fast::hash(payload);
    if actual != expected {
        return Err(FrameError::ChecksumMismatch { expected, actual });
    }
    Ok(payload)
}
