//! Core traits for streaming compression.
//!
//! A [`StreamCodec`] is driven by repeated calls to [`StreamCodec::run`],
//! each handed a fresh input slice and a fresh output slice. A call either
//! makes progress or reports exactly why it could not.

use crate::error::{Result, Yaz0Error};

/// Status of a streaming operation after a `run` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// More input is needed to continue.
    NeedsInput,
    /// More output buffer space is needed.
    NeedsOutput,
    /// The operation is complete and no output is pending.
    Done,
}

/// A resumable compressor or decompressor.
pub trait StreamCodec {
    /// Advance the stream as far as the given buffers allow.
    ///
    /// # Arguments
    ///
    /// * `input` - Input bytes offered for this call
    /// * `output` - Output space offered for this call
    ///
    /// # Returns
    ///
    /// A tuple of (bytes consumed from input, bytes written to output, status)
    fn run(&mut self, input: &[u8], output: &mut [u8]) -> Result<(usize, usize, StreamStatus)>;

    /// Check if the stream has finished.
    fn is_finished(&self) -> bool;

    /// Logical (uncompressed) bytes processed so far.
    fn total_out(&self) -> u64;

    /// Logical size of the whole stream, once known.
    fn expected_size(&self) -> Option<u64>;

    /// Run the stream over a complete input (convenience method).
    ///
    /// Fails with [`Yaz0Error::TruncatedStream`] if the input is exhausted
    /// while the stream still needs more.
    fn run_all(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        let mut input_pos = 0;
        let mut buffer = vec![0u8; 32768];

        loop {
            let (consumed, produced, status) = self.run(&input[input_pos..], &mut buffer)?;

            input_pos += consumed;
            output.extend_from_slice(&buffer[..produced]);

            match status {
                StreamStatus::Done => break,
                StreamStatus::NeedsInput if input_pos >= input.len() => {
                    return Err(Yaz0Error::truncated(
                        self.expected_size().unwrap_or(0),
                        self.total_out(),
                    ));
                }
                StreamStatus::NeedsInput | StreamStatus::NeedsOutput => continue,
            }
        }

        Ok(output)
    }
}

/// Match-finder effort. Higher levels probe more hash slots per position.
///
/// The level never changes the wire format, only how hard the compressor
/// searches for backreferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u8);

impl CompressionLevel {
    /// Fastest compression.
    pub const FAST: Self = Self(1);
    /// Default compression (balanced).
    pub const DEFAULT: Self = Self(6);
    /// Best compression (slowest).
    pub const BEST: Self = Self(9);

    /// Create a custom compression level, clamped to 1-9.
    pub fn new(level: u8) -> Self {
        Self(level.clamp(1, 9))
    }

    /// Get the level value.
    pub fn level(&self) -> u8 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for CompressionLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}
