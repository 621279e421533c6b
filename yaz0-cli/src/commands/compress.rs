//! Compress command implementation.

use super::stream_to_file;
use crate::utils::{compressed_path, create_progress_bar, space_savings};
use std::path::Path;
use yaz0_codec::{Yaz0Config, Yaz0Stream};
use yaz0_core::Yaz0Error;

pub fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    level: u8,
    no_zero_runs: bool,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let len = std::fs::metadata(input)?.len();
    let size = u32::try_from(len).map_err(|_| Yaz0Error::input_too_large(len))?;

    let mut config = Yaz0Config::new(level);
    if no_zero_runs {
        config = config.without_zero_runs();
    }

    let output = output.map_or_else(|| compressed_path(input), Path::to_path_buf);
    let mut stream = Yaz0Stream::compressor(size, config)?;
    let pb = create_progress_bar(len, progress);
    let written = stream_to_file(&mut stream, input, &output, &pb)?;
    pb.finish_and_clear();

    println!(
        "{} -> {} ({} -> {} bytes, {:.1}% saved)",
        input.display(),
        output.display(),
        len,
        written,
        space_savings(len, written)
    );
    Ok(())
}
