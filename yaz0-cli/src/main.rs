//! yaz0 CLI - streaming Yaz0 compressor
//!
//! Compresses, decompresses, verifies and inspects Yaz0 files with a fixed
//! memory footprint, whatever their size.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "yaz0")]
#[command(author, version, about = "Streaming Yaz0 compressor and decompressor")]
#[command(long_about = "
Compress and decompress Yaz0 (SZS) files as used by Nintendo game assets.
Files are processed in 4 KB chunks, so memory use does not grow with the
file size.

Examples:
  yaz0 compress course.bin
  yaz0 compress -l 9 course.bin -o course.szs
  yaz0 decompress course.bin.yaz0
  yaz0 test course.szs
  yaz0 info course.szs --json
")]
struct Cli {
    /// Log codec activity to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file to Yaz0
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output file (defaults to INPUT.yaz0)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compression level (1-9)
        #[arg(short, long, default_value_t = 6, value_parser = clap::value_parser!(u8).range(1..=9))]
        level: u8,

        /// Skip the extra search for zero runs near the start of the file
        #[arg(long)]
        no_zero_runs: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a Yaz0 file
    #[command(alias = "d")]
    Decompress {
        /// Yaz0 file to decompress
        input: PathBuf,

        /// Output file (defaults to INPUT without .yaz0, or INPUT.out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a Yaz0 file without writing the result
    #[command(alias = "t")]
    Test {
        /// Yaz0 file to verify
        input: PathBuf,
    },

    /// Show the header of a Yaz0 file
    #[command(alias = "i")]
    Info {
        /// Yaz0 file to inspect
        input: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            level,
            no_zero_runs,
            progress,
        } => cmd_compress(&input, output.as_deref(), level, no_zero_runs, progress),
        Commands::Decompress {
            input,
            output,
            progress,
        } => cmd_decompress(&input, output.as_deref(), progress),
        Commands::Test { input } => cmd_test(&input),
        Commands::Info { input, json } => cmd_info(&input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
