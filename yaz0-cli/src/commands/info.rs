//! Info command implementation.

use crate::utils::space_savings;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use yaz0_codec::{HEADER_SIZE, Header};

/// Header summary of a Yaz0 file.
#[derive(Debug, Serialize)]
struct Yaz0Info {
    file: String,
    decompressed_size: u32,
    compressed_size: u64,
    space_savings: f64,
}

pub fn cmd_info(input: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut prefix = Vec::with_capacity(HEADER_SIZE);
    File::open(input)?
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut prefix)?;
    let header = Header::from_prefix(&prefix)?;
    let compressed_size = std::fs::metadata(input)?.len();

    let info = Yaz0Info {
        file: input.display().to_string(),
        decompressed_size: header.decompressed_size,
        compressed_size,
        space_savings: space_savings(header.decompressed_size as u64, compressed_size),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Yaz0 Information");
    println!("================");
    println!("File: {}", info.file);
    println!("Decompressed size: {} bytes", info.decompressed_size);
    println!("Compressed size: {} bytes", info.compressed_size);
    if info.decompressed_size > 0 {
        println!("Space savings: {:.1}%", info.space_savings);
    }
    Ok(())
}
