//! # Yaz0 Codec: Streaming Yaz0 Compression
//!
//! This crate compresses and decompresses Yaz0, the LZ77 variant used for
//! game assets on Nintendo consoles, with a fixed memory footprint.
//!
//! ## Features
//!
//! - **Streaming**: both directions suspend on any input or output boundary,
//!   down to single-byte slices, and resume where they stopped
//! - **Bounded memory**: an 8 KB window plus a 256 KB hash table, whatever
//!   the payload size
//! - **Lazy matching**: a deferred-match heuristic with per-level probe limits
//! - **Pure Rust**: no unsafe code
//!
//! ## Format
//!
//! - 16-byte header: `"Yaz0"`, big-endian decompressed size, 8 reserved bytes
//! - Groups of one control byte (MSB first, 1 = literal) and up to 8 tokens
//! - Backreferences reach back up to 4096 bytes and copy 3 to 273 bytes
//!
//! ## Example
//!
//! ```rust
//! use yaz0_codec::{compress, decompress, Yaz0Config};
//!
//! let original = b"Yaz0 Yaz0 Yaz0 Yaz0 Yaz0 Yaz0";
//!
//! let compressed = compress(original, Yaz0Config::DEFAULT).unwrap();
//! assert_eq!(&compressed[..4], b"Yaz0");
//!
//! let decompressed = decompress(&compressed).unwrap();
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use yaz0_codec::{StreamCodec, StreamStatus, Yaz0Stream};
//!
//! let packed = yaz0_codec::compress_default(b"AAAAAAAAAAAA").unwrap();
//! let mut stream = Yaz0Stream::decompressor().unwrap();
//!
//! // Feed one byte at a time into a one-byte output slice.
//! let mut unpacked = Vec::new();
//! let mut pos = 0;
//! loop {
//!     let mut byte = [0u8; 1];
//!     let end = (pos + 1).min(packed.len());
//!     let (consumed, produced, status) = stream.run(&packed[pos..end], &mut byte).unwrap();
//!     pos += consumed;
//!     unpacked.extend_from_slice(&byte[..produced]);
//!     if status == StreamStatus::Done {
//!         break;
//!     }
//! }
//! assert_eq!(unpacked, b"AAAAAAAAAAAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod buffers;
mod compress;
pub mod config;
pub mod decompress;
pub mod format;
pub mod group;
pub mod hash;
pub mod io;
pub mod stream;

pub use config::{Yaz0Config, ZeroRunSearch};
pub use decompress::DecodeState;
pub use format::{HEADER_SIZE, Header, MAGIC};
pub use io::{compress_stream, decompress_stream, pump};
pub use stream::{Mode, Yaz0Stream};
pub use yaz0_core::{CompressionLevel, Result, StreamCodec, StreamStatus, Yaz0Error};

/// Compress data into a complete Yaz0 stream.
///
/// # Parameters
///
/// - `data`: Uncompressed input, at most `u32::MAX` bytes
/// - `config`: Compressor configuration
///
/// # Returns
///
/// Header followed by the compressed groups.
///
/// # Example
///
/// ```rust
/// use yaz0_codec::{compress, Yaz0Config};
///
/// let compressed = compress(&[0u8; 1000], Yaz0Config::FAST).unwrap();
/// assert!(compressed.len() < 100);
/// ```
pub fn compress(data: &[u8], config: Yaz0Config) -> Result<Vec<u8>> {
    let size = u32::try_from(data.len()).map_err(|_| Yaz0Error::input_too_large(data.len() as u64))?;
    let mut stream = Yaz0Stream::compressor(size, config)?;
    stream.run_all(data)
}

/// Compress data with the default configuration (convenience function).
///
/// This is equivalent to `compress(data, Yaz0Config::DEFAULT)`.
pub fn compress_default(data: &[u8]) -> Result<Vec<u8>> {
    compress(data, Yaz0Config::DEFAULT)
}

/// Decompress a complete Yaz0 stream.
///
/// Bytes after the end of the stream are ignored.
///
/// # Example
///
/// ```rust
/// use yaz0_codec::{compress_default, decompress};
///
/// let compressed = compress_default(b"round trip").unwrap();
/// assert_eq!(decompress(&compressed).unwrap(), b"round trip");
/// ```
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut stream = Yaz0Stream::decompressor()?;
    stream.run_all(data)
}

/// Read the decompressed size from the header of a Yaz0 stream.
pub fn decompressed_size(data: &[u8]) -> Result<u32> {
    Header::from_prefix(data).map(|header| header.decompressed_size)
}

/// Check whether data starts with the Yaz0 magic.
pub fn is_yaz0(data: &[u8]) -> bool {
    data.starts_with(&MAGIC)
}
