//! Driving a stream between `std::io` readers and writers.

use crate::config::Yaz0Config;
use crate::stream::Yaz0Stream;
use std::io::{self, Read, Write};
use yaz0_core::error::{Result, Yaz0Error};
use yaz0_core::traits::{StreamCodec, StreamStatus};

/// Size of the input and output buffers used by [`pump`].
pub const IO_BUFFER_SIZE: usize = 0x1000;

fn read_some<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            result => return result,
        }
    }
}

/// Run `codec` to completion, reading from `reader` and writing to `writer`.
///
/// Input is refilled whenever the codec asks for more, and every byte the
/// codec produces is written out straight away. `progress` is called with
/// the total number of input bytes read after each refill.
///
/// Returns the number of bytes written. Fails with
/// [`Yaz0Error::TruncatedStream`] if the reader hits end of file while the
/// codec still needs input.
pub fn pump<C, R, W, F>(codec: &mut C, reader: &mut R, writer: &mut W, mut progress: F) -> Result<u64>
where
    C: StreamCodec + ?Sized,
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let mut input = vec![0u8; IO_BUFFER_SIZE];
    let mut output = vec![0u8; IO_BUFFER_SIZE];
    let (mut in_pos, mut in_len) = (0, 0);
    let mut read = 0u64;
    let mut written = 0u64;

    loop {
        let (consumed, produced, status) = codec.run(&input[in_pos..in_len], &mut output)?;
        in_pos += consumed;

        if produced > 0 {
            writer.write_all(&output[..produced])?;
            written += produced as u64;
        }

        match status {
            StreamStatus::Done => break,
            StreamStatus::NeedsOutput => continue,
            StreamStatus::NeedsInput => {
                input.copy_within(in_pos..in_len, 0);
                in_len -= in_pos;
                in_pos = 0;

                let n = read_some(reader, &mut input[in_len..])?;
                if n == 0 {
                    return Err(Yaz0Error::truncated(
                        codec.expected_size().unwrap_or(0),
                        codec.total_out(),
                    ));
                }
                in_len += n;
                read += n as u64;
                progress(read);
            }
        }
    }

    writer.flush()?;
    Ok(written)
}

/// Compress exactly `size` bytes from `reader` into `writer`.
///
/// Returns the number of compressed bytes written.
pub fn compress_stream<R, W>(reader: &mut R, writer: &mut W, size: u32, config: Yaz0Config) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut stream = Yaz0Stream::compressor(size, config)?;
    pump(&mut stream, reader, writer, |_| {})
}

/// Decompress one Yaz0 stream from `reader` into `writer`.
///
/// Returns the number of decompressed bytes written.
pub fn decompress_stream<R, W>(reader: &mut R, writer: &mut W) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut stream = Yaz0Stream::decompressor()?;
    pump(&mut stream, reader, writer, |_| {})
}
