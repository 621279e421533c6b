//! Yaz0 wire format constants and the 16-byte header.
//!
//! ```text
//! offset  size  field
//! 0       4     magic "Yaz0"
//! 4       4     decompressed size (big-endian)
//! 8       8     reserved (zero)
//! 16      ...   groups
//! ```

use yaz0_core::error::{Result, Yaz0Error};

/// Stream magic.
pub const MAGIC: [u8; 4] = *b"Yaz0";

/// Size of the stream header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Maximum backreference distance.
pub const MAX_DISTANCE: usize = 0x1000;

/// Shortest backreference worth emitting.
pub const MIN_MATCH: usize = 3;

/// Longest encodable backreference.
pub const MAX_MATCH: usize = 0x111;

/// Lengths from here on use the 3-byte token form.
pub const LONG_MATCH: usize = 0x12;

/// Tokens described by one control byte.
pub const GROUP_TOKENS: usize = 8;

/// Largest encoded group: control byte plus eight 3-byte tokens.
pub const MAX_GROUP_SIZE: usize = 1 + GROUP_TOKENS * 3;

/// Largest number of bytes one group can expand to.
pub const MAX_GROUP_OUTPUT: usize = GROUP_TOKENS * MAX_MATCH;

/// Parsed Yaz0 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Size of the stream once decompressed.
    pub decompressed_size: u32,
}

impl Header {
    /// Create a header for a payload of the given size.
    pub fn new(decompressed_size: u32) -> Self {
        Self { decompressed_size }
    }

    /// Parse a header, validating the magic.
    ///
    /// The reserved bytes are not checked; some producers store alignment
    /// hints there.
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != MAGIC {
            return Err(Yaz0Error::bad_magic(MAGIC, magic));
        }
        let decompressed_size = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self { decompressed_size })
    }

    /// Parse the header at the start of a buffer.
    pub fn from_prefix(data: &[u8]) -> Result<Self> {
        let bytes: &[u8; HEADER_SIZE] = data
            .get(..HEADER_SIZE)
            .and_then(|prefix| prefix.try_into().ok())
            .ok_or_else(|| Yaz0Error::truncated(HEADER_SIZE as u64, data.len() as u64))?;
        Self::parse(bytes)
    }

    /// Serialize the header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(&MAGIC);
        bytes[4..8].copy_from_slice(&self.decompressed_size.to_be_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let bytes = Header::new(0x0102_0304).to_bytes();
        assert_eq!(&bytes[..4], b"Yaz0");
        assert_eq!(&bytes[4..8], &[0x01, 0x02, 0x03, 0x04]);
        assert!(bytes[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_header_parse() {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[..4].copy_from_slice(b"Yaz0");
        bytes[7] = 12;
        assert_eq!(Header::parse(&bytes).unwrap().decompressed_size, 12);
    }

    #[test]
    fn test_header_bad_magic() {
        let mut bytes = Header::new(5).to_bytes();
        bytes[3] = b'1';
        let err = Header::parse(&bytes).unwrap_err();
        assert!(matches!(err, Yaz0Error::BadMagic { found, .. } if &found == b"Yaz1"));
    }

    #[test]
    fn test_header_ignores_reserved() {
        let mut bytes = Header::new(7).to_bytes();
        bytes[8..12].copy_from_slice(&0x2000u32.to_be_bytes());
        assert_eq!(Header::parse(&bytes).unwrap(), Header::new(7));
    }

    #[test]
    fn test_header_from_short_prefix() {
        let err = Header::from_prefix(b"Yaz0\0\0").unwrap_err();
        assert!(matches!(err, Yaz0Error::TruncatedStream { expected: 16, produced: 6 }));
    }

    #[test]
    fn test_format_bounds() {
        assert_eq!(MAX_GROUP_SIZE, 25);
        assert_eq!(MAX_GROUP_OUTPUT, 0x888);
        assert_eq!(LONG_MATCH - 1, 0x11);
        assert_eq!(MAX_MATCH, LONG_MATCH + 0xFF);
    }
}
