use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use sliding_average::{
    Real, loader::load_streams, processing::smooth_streams, window::radius_from_signed,
};
use smoothing_common::{TracerOptions, init_tracer};
use tracing::{info, level_filters::LevelFilter};

// cargo run --bin sliding-average -- --radius 15 --input trips.txt --with-index

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Half-width of the averaging window, each average covers at most 2k+1 samples
    #[clap(
        short = 'k',
        long,
        env = "SLIDING_AVERAGE_RADIUS",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    radius: i64,

    /// File of samples, one per line, with blank lines between streams. Reads stdin if omitted
    #[clap(long)]
    input: Option<PathBuf>,

    /// File to write the averages to. Writes to stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,

    /// Prefix each average with the index of the sample its window is centred on
    #[clap(long)]
    with_index: bool,
}

fn main() -> Result<()> {
    let tracer = init_tracer!(TracerOptions::new(LevelFilter::WARN))?;

    let args = Cli::parse();
    let radius = radius_from_signed(args.radius)?;

    let streams = match &args.input {
        Some(path) => load_streams(BufReader::new(
            File::open(path)
                .with_context(|| format!("Cannot open input file {}", path.display()))?,
        )),
        None => load_streams(io::stdin().lock()),
    }
    .context("Cannot load sample streams")?;

    info!(
        service = tracer.service_name(),
        num_streams = streams.len(),
        radius,
        "Smoothing streams"
    );
    let smoothed = smooth_streams(&streams, radius);

    match &args.output {
        Some(path) => write_streams(
            BufWriter::new(
                File::create(path)
                    .with_context(|| format!("Cannot create output file {}", path.display()))?,
            ),
            &smoothed,
            args.with_index,
        ),
        None => write_streams(
            BufWriter::new(io::stdout().lock()),
            &smoothed,
            args.with_index,
        ),
    }
    .context("Cannot write averages")?;

    Ok(())
}

/// Writes one average per line, with a blank line between streams.
fn write_streams<W: Write>(
    mut writer: W,
    streams: &[Vec<(usize, Real)>],
    with_index: bool,
) -> io::Result<()> {
    for (stream_index, stream) in streams.iter().enumerate() {
        if stream_index > 0 {
            writeln!(writer)?;
        }
        for (centre, average) in stream {
            if with_index {
                writeln!(writer, "{centre}\t{average}")?;
            } else {
                writeln!(writer, "{average}")?;
            }
        }
    }
    writer.flush()
}
