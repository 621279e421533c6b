//! Compressor configuration.

use crate::format::MAX_DISTANCE;
use yaz0_core::CompressionLevel;

/// Hash probes per position, indexed by compression level.
const PROBES_PER_LEVEL: [usize; 10] = [0x0, 0x1, 0x2, 0x4, 0x8, 0x10, 0x40, 0x100, 0x200, 0x1000];

/// Distance window scanned for runs of zero bytes near the stream start.
///
/// Assets are often padded with leading zeros that the hash chain has
/// already evicted by the time a later run starts. Only distances in
/// `(near, far]` that lie within the bytes already seen are probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroRunSearch {
    /// Exclusive lower bound of probed distances.
    pub near: u16,
    /// Inclusive upper bound of probed distances (at most 0x1000).
    pub far: u16,
}

impl ZeroRunSearch {
    /// The window used by the reference encoder.
    pub const DEFAULT: Self = Self {
        near: 0x990,
        far: MAX_DISTANCE as u16,
    };
}

impl Default for ZeroRunSearch {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Yaz0 compressor configuration.
///
/// Nothing here changes the wire format; decoders need no configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Yaz0Config {
    /// Match-finder effort.
    pub level: CompressionLevel,
    /// Extra search for zero runs at the start of the stream.
    pub zero_run: Option<ZeroRunSearch>,
}

impl Yaz0Config {
    /// Balanced configuration (level 6).
    pub const DEFAULT: Self = Self {
        level: CompressionLevel::DEFAULT,
        zero_run: Some(ZeroRunSearch::DEFAULT),
    };

    /// Fastest configuration (level 1).
    pub const FAST: Self = Self {
        level: CompressionLevel::FAST,
        zero_run: Some(ZeroRunSearch::DEFAULT),
    };

    /// Best compression (level 9).
    pub const BEST: Self = Self {
        level: CompressionLevel::BEST,
        zero_run: Some(ZeroRunSearch::DEFAULT),
    };

    /// Create a configuration for the given level.
    pub fn new(level: impl Into<CompressionLevel>) -> Self {
        Self {
            level: level.into(),
            ..Self::DEFAULT
        }
    }

    /// Disable the zero-run search.
    pub fn without_zero_runs(mut self) -> Self {
        self.zero_run = None;
        self
    }

    /// Hash slots probed per lookup or insertion.
    pub fn max_probes(&self) -> usize {
        PROBES_PER_LEVEL[self.level.level() as usize]
    }
}

impl Default for Yaz0Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Yaz0Config::FAST.max_probes(), 1);
        assert_eq!(Yaz0Config::DEFAULT.max_probes(), 0x40);
        assert_eq!(Yaz0Config::BEST.max_probes(), 0x1000);
        assert_eq!(Yaz0Config::default(), Yaz0Config::DEFAULT);
    }

    #[test]
    fn test_level_zero_still_probes() {
        assert_eq!(Yaz0Config::new(0).max_probes(), 1);
    }

    #[test]
    fn test_without_zero_runs() {
        let config = Yaz0Config::new(3).without_zero_runs();
        assert_eq!(config.level.level(), 3);
        assert!(config.zero_run.is_none());
    }
}
