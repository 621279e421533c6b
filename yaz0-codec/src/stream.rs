//! The Yaz0 stream context.
//!
//! A [`Yaz0Stream`] owns everything one compression or decompression needs:
//! the window, the engine state and (when compressing) the hash table. The
//! caller drives it through [`StreamCodec::run`] with whatever input and
//! output slices it has at hand.

use crate::buffers::Buffers;
use crate::compress::Encoder;
use crate::config::Yaz0Config;
use crate::decompress::{DecodeState, Decoder};
use tracing::debug;
use yaz0_core::error::{Result, Yaz0Error};
use yaz0_core::traits::{StreamCodec, StreamStatus};
use yaz0_core::window::{WINDOW_SIZE, Window};

/// Direction of a stream, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Yaz0 data in, raw bytes out.
    Decompress,
    /// Raw bytes in, Yaz0 data out.
    Compress,
}

#[derive(Debug)]
enum Engine {
    Decompress(Decoder),
    Compress(Encoder),
}

/// Resumable Yaz0 compressor or decompressor.
///
/// Memory use is fixed at construction (an 8 KB window, plus a 256 KB
/// hash table when compressing) and independent of the payload size.
///
/// # Example
///
/// ```rust
/// use yaz0_codec::{StreamCodec, StreamStatus, Yaz0Config, Yaz0Stream};
///
/// let data = b"hello hello hello";
/// let mut compressor = Yaz0Stream::compressor(data.len() as u32, Yaz0Config::DEFAULT).unwrap();
/// let mut packed = [0u8; 64];
/// let (consumed, produced, status) = compressor.run(data, &mut packed).unwrap();
/// assert_eq!(consumed, data.len());
/// assert_eq!(status, StreamStatus::Done);
///
/// let mut decompressor = Yaz0Stream::decompressor().unwrap();
/// let mut unpacked = [0u8; 64];
/// let (_, n, status) = decompressor.run(&packed[..produced], &mut unpacked).unwrap();
/// assert_eq!(status, StreamStatus::Done);
/// assert_eq!(&unpacked[..n], data);
/// ```
#[derive(Debug)]
pub struct Yaz0Stream {
    window: Window,
    engine: Engine,
    total_in: u64,
    /// First fatal error; every later `run` reports it again.
    failed: Option<Yaz0Error>,
    finished: bool,
}

impl Yaz0Stream {
    /// Create a decompressor. The payload size is read from the header.
    pub fn decompressor() -> Result<Self> {
        Ok(Self::with_engine(
            Window::new(WINDOW_SIZE)?,
            Engine::Decompress(Decoder::new()),
        ))
    }

    /// Create a compressor for a payload of exactly `size` bytes.
    ///
    /// The size is written into the header before any data is seen, so it
    /// must be known up front.
    pub fn compressor(size: u32, config: Yaz0Config) -> Result<Self> {
        let window = Window::new(WINDOW_SIZE)?;
        let encoder = Encoder::new(size, config)?;
        debug!(
            size,
            level = config.level.level(),
            zero_run = config.zero_run.is_some(),
            "created yaz0 compressor"
        );
        Ok(Self::with_engine(window, Engine::Compress(encoder)))
    }

    fn with_engine(window: Window, engine: Engine) -> Self {
        Self {
            window,
            engine,
            total_in: 0,
            failed: None,
            finished: false,
        }
    }

    /// Direction of this stream.
    pub fn mode(&self) -> Mode {
        match self.engine {
            Engine::Decompress(_) => Mode::Decompress,
            Engine::Compress(_) => Mode::Compress,
        }
    }

    /// Size of the payload once decompressed.
    ///
    /// For a decompressor this is `None` until the header has been parsed.
    pub fn decompressed_size(&self) -> Option<u32> {
        match &self.engine {
            Engine::Decompress(decoder) => decoder.header().map(|h| h.decompressed_size),
            Engine::Compress(encoder) => Some(encoder.size()),
        }
    }

    /// Input bytes consumed over the life of the stream.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decoder position, or `None` for a compressor.
    pub fn decode_state(&self) -> Option<DecodeState> {
        match &self.engine {
            Engine::Decompress(decoder) => Some(decoder.state()),
            Engine::Compress(_) => None,
        }
    }

    /// Compressor settings, or `None` for a decompressor.
    pub fn config(&self) -> Option<&Yaz0Config> {
        match &self.engine {
            Engine::Decompress(_) => None,
            Engine::Compress(encoder) => Some(encoder.config()),
        }
    }

    /// The error that stopped this stream, if any.
    pub fn error(&self) -> Option<&Yaz0Error> {
        self.failed.as_ref()
    }
}

impl StreamCodec for Yaz0Stream {
    fn run(&mut self, input: &[u8], output: &mut [u8]) -> Result<(usize, usize, StreamStatus)> {
        if let Some(err) = &self.failed {
            return Err(err.duplicate());
        }

        let mut io = Buffers::new(input, output);
        let result = match &mut self.engine {
            Engine::Decompress(decoder) => decoder.run(&mut self.window, &mut io),
            Engine::Compress(encoder) => encoder.run(&mut self.window, &mut io),
        };
        let (consumed, produced) = (io.consumed(), io.produced());
        self.total_in += consumed as u64;

        match result {
            Ok(status) => {
                if status == StreamStatus::Done && !self.finished {
                    self.finished = true;
                    debug!(
                        mode = ?self.mode(),
                        total_in = self.total_in,
                        total_out = self.total_out(),
                        "yaz0 stream finished"
                    );
                }
                Ok((consumed, produced, status))
            }
            Err(err) => {
                debug!(error = %err, "yaz0 stream failed");
                self.failed = Some(err.duplicate());
                Err(err)
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn total_out(&self) -> u64 {
        match &self.engine {
            Engine::Decompress(decoder) => decoder.total_out() as u64,
            Engine::Compress(encoder) => encoder.total_out() as u64,
        }
    }

    fn expected_size(&self) -> Option<u64> {
        self.decompressed_size().map(u64::from)
    }
}
