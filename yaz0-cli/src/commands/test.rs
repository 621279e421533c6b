//! Test command implementation.

use std::fs::File;
use std::io;
use std::path::Path;
use yaz0_codec::{Yaz0Stream, pump};
use yaz0_core::StreamCodec;

pub fn cmd_test(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = File::open(input)?;
    let mut stream = Yaz0Stream::decompressor()?;
    pump(&mut stream, &mut reader, &mut io::sink(), |_| {})?;

    println!(
        "{}: OK ({} bytes from {} compressed)",
        input.display(),
        stream.total_out(),
        stream.total_in()
    );
    Ok(())
}
