//! Decompress command implementation.

use super::stream_to_file;
use crate::utils::{create_progress_bar, decompressed_path};
use std::path::Path;
use yaz0_codec::Yaz0Stream;

pub fn cmd_decompress(
    input: &Path,
    output: Option<&Path>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let len = std::fs::metadata(input)?.len();
    let output = output.map_or_else(|| decompressed_path(input), Path::to_path_buf);

    let mut stream = Yaz0Stream::decompressor()?;
    let pb = create_progress_bar(len, progress);
    let written = stream_to_file(&mut stream, input, &output, &pb)?;
    pb.finish_and_clear();

    println!(
        "{} -> {} ({} -> {} bytes)",
        input.display(),
        output.display(),
        len,
        written
    );
    Ok(())
}
