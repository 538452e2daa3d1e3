//! KISS → SSDV extraction tool
//!
//! Main entry point: reads a recorded KISS capture, extracts the SSDV packets
//! of the selected satellite and hands each image to the external decoder.

mod logging;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ssdv_core::Satellite;
use ssdv_link::{ExternalDecoder, ExtractionPipeline};
use std::path::PathBuf;
use tracing::info;

use logging::LogLevel;

/// 命令行中的卫星选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SatelliteArg {
    #[value(name = "A", alias = "a")]
    A,
    #[value(name = "B", alias = "b")]
    B,
    #[value(name = "C", alias = "c")]
    C,
}

impl From<SatelliteArg> for Satellite {
    fn from(arg: SatelliteArg) -> Self {
        match arg {
            SatelliteArg::A => Satellite::A,
            SatelliteArg::B => Satellite::B,
            SatelliteArg::C => Satellite::C,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Satellite framing of the capture
    #[arg(short, long, value_enum)]
    satellite: SatelliteArg,

    /// KISS capture file
    input: PathBuf,

    /// Output base name; writes <OUTPUT>_<id>.ssdv and <OUTPUT>_<id>.jpg
    output: PathBuf,

    /// SSDV decoder program
    #[arg(long, env = "SSDV_DECODER", default_value = "ssdv")]
    decoder: PathBuf,

    /// Only write the .ssdv files, do not run the decoder
    #[arg(long)]
    no_decode: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level);

    let satellite = Satellite::from(args.satellite);
    let mut pipeline = ExtractionPipeline::new(satellite);
    if !args.no_decode {
        pipeline = pipeline.with_decoder(Box::new(ExternalDecoder::new(&args.decoder)));
    }

    info!(
        "extracting satellite {} SSDV images from {}",
        satellite,
        args.input.display()
    );
    let report = pipeline
        .run_file(&args.input, &args.output)
        .with_context(|| format!("failed to extract images from {}", args.input.display()))?;

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("failed to write report {}", path.display()))?;
    }

    for image in report.images.iter().filter(|i| i.decode_error.is_some()) {
        info!(
            "image {} left undecoded in {}",
            image.image_id,
            image.ssdv_path.display()
        );
    }

    Ok(())
}
