use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use flate2::read::DeflateDecoder;
use log::info;
use rawflate::{CompressConfig, Compressor, Error, Strategy};

#[derive(Parser, Debug)]
#[command(name = "rawflate")]
#[command(about = "Compress a file into a raw DEFLATE (RFC 1951) stream")]
#[command(version)]
struct Args {
    /// Input file (use - for stdin)
    #[arg(long)]
    src: PathBuf,

    /// Use the fixed Huffman strategy (shorthand for --strategy fixed)
    #[arg(long, conflicts_with = "strategy")]
    fixed: bool,

    /// Huffman strategy: fixed or dynamic
    #[arg(long, default_value = "dynamic")]
    strategy: Strategy,

    /// Output file (default: stdout)
    #[arg(short, long, conflicts_with = "derive_name")]
    output: Option<PathBuf>,

    /// Write to <src>.fixed.deflate or <src>.dynamic.deflate
    #[arg(long)]
    derive_name: bool,

    /// Maximum uncompressed bytes per DEFLATE block (default: one block)
    #[arg(long)]
    block_size: Option<usize>,

    /// Inflate the result and check it reproduces the input
    #[arg(long)]
    verify: bool,

    /// Show verbose statistics
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let strategy = if args.fixed { Strategy::Fixed } else { args.strategy };
    let is_stdin = args.src.to_str() == Some("-");

    let input = read_input(&args.src, is_stdin)?;

    let config = CompressConfig { strategy, block_size: args.block_size, ..Default::default() };
    let mut compressor = Compressor::new(config);

    let start = std::time::Instant::now();
    let compressed = compressor.compress(&input)?;
    let elapsed = start.elapsed();

    if args.verify {
        verify(&compressed, &input)?;
        info!("verified {} bytes", input.len());
    }

    let output_path = if args.derive_name {
        if is_stdin {
            return Err("--derive-name needs a file path for --src, not stdin".into());
        }
        let path = derived_output_path(&args.src, strategy);
        eprintln!("writing to {}", path.display());
        Some(path)
    } else {
        args.output.clone().filter(|p| p.to_str() != Some("-"))
    };

    match output_path {
        Some(path) => {
            let mut out = BufWriter::new(File::create(&path)?);
            out.write_all(&compressed)?;
            out.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&compressed)?;
            stdout.flush()?;
        }
    }

    if args.verbose {
        let stats = compressor.stats();
        eprintln!("Compression complete:");
        eprintln!("  Strategy:         {}", strategy);
        eprintln!("  Input bytes:      {}", stats.input_bytes);
        eprintln!("  Output bytes:     {}", stats.output_bytes);
        eprintln!("  Blocks:           {}", stats.blocks_written);
        eprintln!("  Literals:         {}", stats.literals);
        eprintln!("  Matches:          {} ({} bytes)", stats.matches, stats.matched_bytes);
        eprintln!("  Time:             {:.2?}", elapsed);
        if stats.input_bytes > 0 {
            eprintln!(
                "  Ratio:            {:.3}",
                stats.output_bytes as f64 / stats.input_bytes as f64
            );
            eprintln!(
                "  Throughput:       {:.1} MB/s",
                stats.input_bytes as f64 / elapsed.as_secs_f64() / 1_000_000.0
            );
        }
    }

    Ok(())
}

fn read_input(src: &Path, is_stdin: bool) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    if is_stdin {
        io::stdin().lock().read_to_end(&mut data)?;
    } else {
        File::open(src)?.read_to_end(&mut data)?;
    }
    Ok(data)
}

/// `<src>.fixed.deflate` or `<src>.dynamic.deflate`
fn derived_output_path(src: &Path, strategy: Strategy) -> PathBuf {
    let mut name = src.as_os_str().to_owned();
    name.push(format!(".{}.deflate", strategy));
    PathBuf::from(name)
}

fn verify(compressed: &[u8], original: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
    let mut inflated = Vec::with_capacity(original.len());
    DeflateDecoder::new(compressed).read_to_end(&mut inflated)?;
    if inflated != original {
        return Err(format!(
            "verification failed: inflated {} bytes, expected {}",
            inflated.len(),
            original.len()
        )
        .into());
    }
    Ok(())
}
