//! Error types for Yaz0 operations.
//!
//! Flow-control conditions (more input, more output space) are not errors;
//! they are reported through [`crate::traits::StreamStatus`]. Everything in
//! [`Yaz0Error`] is terminal for the stream that produced it.

use std::io;
use thiserror::Error;

/// The main error type for Yaz0 operations.
#[derive(Debug, Error)]
pub enum Yaz0Error {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The stream does not start with the Yaz0 magic.
    #[error("Bad magic: expected {expected:02x?}, found {found:02x?}")]
    BadMagic {
        /// Expected magic bytes.
        expected: [u8; 4],
        /// Actual magic bytes found.
        found: [u8; 4],
    },

    /// Allocation of the stream buffers failed.
    #[error("Out of memory: could not allocate {requested} bytes")]
    OutOfMemory {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// Input ended while the decoder still needed data.
    #[error("Truncated stream: produced {produced} of {expected} bytes")]
    TruncatedStream {
        /// Decompressed size announced by the header.
        expected: u64,
        /// Bytes produced before the input ran out.
        produced: u64,
    },

    /// The payload cannot be described by the 32-bit size field.
    #[error("Input too large: {size} bytes exceeds the 32-bit size field")]
    InputTooLarge {
        /// Size of the rejected input.
        size: u64,
    },
}

/// Result type alias for Yaz0 operations.
pub type Result<T> = std::result::Result<T, Yaz0Error>;

impl Yaz0Error {
    /// Create a bad magic error.
    pub fn bad_magic(expected: [u8; 4], found: [u8; 4]) -> Self {
        Self::BadMagic { expected, found }
    }

    /// Create an out of memory error.
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create a truncated stream error.
    pub fn truncated(expected: u64, produced: u64) -> Self {
        Self::TruncatedStream { expected, produced }
    }

    /// Create an input too large error.
    pub fn input_too_large(size: u64) -> Self {
        Self::InputTooLarge { size }
    }

    /// Whether the error describes malformed or incomplete compressed data.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::BadMagic { .. } | Self::TruncatedStream { .. })
    }

    /// Clone the error for re-reporting from a poisoned stream.
    ///
    /// `io::Error` is not `Clone`; its kind and message are preserved.
    pub fn duplicate(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::BadMagic { expected, found } => Self::bad_magic(*expected, *found),
            Self::OutOfMemory { requested } => Self::out_of_memory(*requested),
            Self::TruncatedStream { expected, produced } => Self::truncated(*expected, *produced),
            Self::InputTooLarge { size } => Self::input_too_large(*size),
        }
    }
}
