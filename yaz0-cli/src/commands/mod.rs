//! Command implementations for the yaz0 CLI.

pub mod compress;
pub mod decompress;
pub mod info;
pub mod test;

pub use compress::cmd_compress;
pub use decompress::cmd_decompress;
pub use info::cmd_info;
pub use test::cmd_test;

use indicatif::ProgressBar;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::warn;
use yaz0_codec::{Yaz0Stream, pump};
use yaz0_core::Result;

/// Run `stream` from `input` into a new file at `output`.
///
/// A partially written output file is removed when the stream fails.
pub(crate) fn stream_to_file(
    stream: &mut Yaz0Stream,
    input: &Path,
    output: &Path,
    pb: &ProgressBar,
) -> Result<u64> {
    let mut reader = File::open(input)?;
    let mut writer = BufWriter::new(File::create(output)?);
    let result = pump(stream, &mut reader, &mut writer, |read| pb.set_position(read));

    if result.is_err() {
        drop(writer);
        if let Err(e) = fs::remove_file(output) {
            warn!(path = %output.display(), error = %e, "could not remove partial output");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use yaz0_codec::Yaz0Config;
    use yaz0_core::Yaz0Error;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("yaz0-cli-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_stream_to_file_roundtrip() {
        let data = b"level data level data level data".repeat(50);
        let raw = scratch("roundtrip.bin");
        let packed = scratch("roundtrip.bin.yaz0");
        let unpacked = scratch("roundtrip.out");
        fs::write(&raw, &data).unwrap();

        let pb = ProgressBar::hidden();
        let mut stream = Yaz0Stream::compressor(data.len() as u32, Yaz0Config::DEFAULT).unwrap();
        let written = stream_to_file(&mut stream, &raw, &packed, &pb).unwrap();
        assert_eq!(written, fs::metadata(&packed).unwrap().len());

        let mut stream = Yaz0Stream::decompressor().unwrap();
        stream_to_file(&mut stream, &packed, &unpacked, &pb).unwrap();
        assert_eq!(fs::read(&unpacked).unwrap(), data);

        for path in [raw, packed, unpacked] {
            fs::remove_file(path).unwrap();
        }
    }

    #[test]
    fn test_partial_output_removed_on_failure() {
        let truncated = scratch("truncated.yaz0");
        let output = scratch("truncated.out");
        let mut data = yaz0_codec::compress_default(&[3u8; 4000]).unwrap();
        data.truncate(20);
        fs::write(&truncated, &data).unwrap();

        let mut stream = Yaz0Stream::decompressor().unwrap();
        let err = stream_to_file(&mut stream, &truncated, &output, &ProgressBar::hidden()).unwrap_err();
        assert!(matches!(err, Yaz0Error::TruncatedStream { .. }));
        assert!(!output.exists());

        fs::remove_file(truncated).unwrap();
    }
}
