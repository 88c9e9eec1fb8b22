use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use block_dct::presenter::{Presenter, TextPresenter};
use block_dct::source::{BlockSource, FixedSource, RandomSource, RawFileSource};
use block_dct::{DctAlgorithm, Pipeline, PipelineConfig, QuantTableId, SamplePrecision};
use clap::{Parser, ValueEnum};
use log::{debug, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceKind {
    /// The built-in 8x8 reference block
    Fixed,
    /// Uniform random samples from an explicit seed
    Random,
    /// Raw 8-bit samples from a file, N*N bytes per block
    File,
}

#[derive(Parser)]
#[command(name = "block_dct")]
#[command(about = "Forward DCT-II and quantization over square sample blocks", long_about = None)]
struct Cli {
    #[arg(long, value_enum, default_value_t = SourceKind::Fixed)]
    source: SourceKind,

    /// Seed for the random source
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Input for the file source
    #[arg(long)]
    path: Option<PathBuf>,

    /// Number of blocks to process
    #[arg(long, default_value_t = 1)]
    blocks: usize,

    /// linear-ramp, perceptual, jpeg-luminance or jpeg-chrominance
    #[arg(long, default_value_t = QuantTableId::LinearRamp)]
    table: QuantTableId,

    /// Scale the table with the libjpeg quality curve (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Block side length N
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Sample bit depth: 8, 12 or 16
    #[arg(long, default_value_t = 8)]
    bits: u8,

    /// direct or separable
    #[arg(long, default_value_t = DctAlgorithm::Separable)]
    algorithm: DctAlgorithm,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn open_source(cli: &Cli, precision: SamplePrecision) -> Result<Box<dyn BlockSource>> {
    let source: Box<dyn BlockSource> = match cli.source {
        SourceKind::Fixed => Box::new(FixedSource::reference()),
        SourceKind::Random => Box::new(RandomSource::new(cli.seed, precision)),
        SourceKind::File => {
            let path = cli
                .path
                .as_ref()
                .ok_or(anyhow!("--path is required with --source file"))?;
            Box::new(
                RawFileSource::open(path)
                    .with_context(|| format!("failed to open {}", path.display()))?,
            )
        }
    };

    Ok(source)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let precision = SamplePrecision::parse(cli.bits)?;
    let config = PipelineConfig {
        block_size: cli.size,
        precision,
        table: cli.table,
        quality: cli.quality,
        algorithm: cli.algorithm,
        ..Default::default()
    };
    debug!("{config:?}");

    let pipeline = Pipeline::new(&config).context("invalid pipeline configuration")?;
    let mut source = open_source(&cli, precision)?;

    let mut presenter = TextPresenter::new(io::stdout().lock());
    let mut index = 0;
    let processed = pipeline.run_each(source.as_mut(), cli.blocks, |result| {
        debug!(
            "block {index}: {} of {} quantized coefficients are zero",
            result.quantized.count_zeros(),
            config.block_size * config.block_size
        );
        index += 1;

        presenter.present("Printing pixel matrix:", &result.samples)?;
        presenter.present("Printing DCT matrix....", &result.coefficients)?;
        presenter.present("Printing quantized DCT matrix....", &result.quantized)
    })?;
    info!("{processed} of {} requested blocks processed", cli.blocks);

    Ok(())
}
