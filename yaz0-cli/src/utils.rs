//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension used for compressed files.
pub const YAZ0_EXTENSION: &str = "yaz0";

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Output path for `compress`: `INPUT.yaz0`.
pub fn compressed_path(input: &Path) -> PathBuf {
    append_extension(input, YAZ0_EXTENSION)
}

/// Output path for `decompress`: `INPUT` minus a trailing `.yaz0`, else `INPUT.out`.
pub fn decompressed_path(input: &Path) -> PathBuf {
    match input.extension() {
        Some(ext) if ext.eq_ignore_ascii_case(YAZ0_EXTENSION) => input.with_extension(""),
        _ => append_extension(input, "out"),
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// Space saved by compression, in percent.
pub fn space_savings(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        (1.0 - compressed as f64 / original as f64) * 100.0
    }
}
