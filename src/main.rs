use std::path::PathBuf;

use anyhow::{Context, bail};
use chromostereo::image_pipeline::{
    ChromoStereoPipeline, DepthSource, EffectParameters, ImageCrateReader, OutputConfig,
    PrecomputedDepth, StandardTiffWriter, TiffCompression,
};
use chromostereo::logger;
use clap::{Args, Parser, ValueEnum};

use tracing::info;

#[derive(Parser)]
#[command(name = "chromostereo")]
#[command(version, about = "Red/blue chromostereopsis rendering from a photo and its depth", long_about = None)]
struct Cli {
    /// Source photo
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output TIFF
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Precomputed grayscale depth image, same size as INPUT
    #[arg(long, value_name = "FILE")]
    depth: Option<PathBuf>,

    /// ONNX depth model to run on INPUT
    #[cfg(feature = "onnx")]
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Also write the depth map as a grayscale TIFF
    #[arg(long, value_name = "FILE")]
    depth_out: Option<PathBuf>,

    #[command(flatten)]
    effect: EffectArgs,

    /// TIFF compression
    #[arg(long, value_enum, default_value_t = CompressionArg::Deflate)]
    compression: CompressionArg,

    /// Log per-stage timings
    #[arg(long)]
    timings: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Args)]
struct EffectArgs {
    /// Depth of the red/blue crossover (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    threshold: i32,

    /// Sharpness of the crossover (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    depth_scale: i32,

    /// Softening of the crossover (0-100)
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i32).range(0..=100))]
    feather: i32,

    /// Red gain, 50 = unity (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    red: i32,

    /// Blue gain, 50 = unity (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    blue: i32,

    /// Luminance gamma (0-100)
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(i32).range(0..=100))]
    gamma: i32,

    /// Black point (0-100)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..=100))]
    black: i32,

    /// White point (0-100)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(i32).range(0..=100))]
    white: i32,

    /// Edge-aware depth smoothing, 0 disables (0-100)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(i32).range(0..=100))]
    smoothing: i32,
}

impl EffectArgs {
    fn to_parameters(&self) -> EffectParameters {
        EffectParameters::builder()
            .threshold(self.threshold)
            .depth_scale(self.depth_scale)
            .feather(self.feather)
            .red_brightness(self.red)
            .blue_brightness(self.blue)
            .gamma(self.gamma)
            .black_level(self.black)
            .white_level(self.white)
            .smoothing(self.smoothing)
            .build()
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CompressionArg {
    None,
    Lzw,
    DeflateFast,
    Deflate,
    DeflateBest,
}

impl From<CompressionArg> for TiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => TiffCompression::None,
            CompressionArg::Lzw => TiffCompression::Lzw,
            CompressionArg::DeflateFast => TiffCompression::DeflateFast,
            CompressionArg::Deflate => TiffCompression::DeflateBalanced,
            CompressionArg::DeflateBest => TiffCompression::DeflateBest,
        }
    }
}

fn depth_source(
    cli: &Cli,
    pipeline: &ChromoStereoPipeline<ImageCrateReader, StandardTiffWriter>,
) -> anyhow::Result<Box<dyn DepthSource>> {
    #[cfg(feature = "onnx")]
    if let Some(model) = &cli.model {
        if cli.depth.is_some() {
            bail!("--depth and --model are mutually exclusive");
        }
        let estimator = chromostereo::image_pipeline::load_model(model)
            .with_context(|| format!("loading depth model {}", model.display()))?;
        return Ok(Box::new(estimator));
    }

    match &cli.depth {
        Some(path) => {
            let depth = pipeline
                .read_depth_file(path)
                .with_context(|| format!("reading depth map {}", path.display()))?;
            Ok(Box::new(PrecomputedDepth::new(depth)))
        }
        None if cfg!(feature = "onnx") => bail!("a depth source is required: --depth <FILE> or --model <FILE>"),
        None => bail!("a depth source is required: --depth <FILE>"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_with_default(if cli.verbose { "debug" } else { "info" });

    info!("Starting chromostereo...");

    let config = OutputConfig::builder()
        .compression(cli.compression.into())
        .build();
    let pipeline = ChromoStereoPipeline::new(config);
    let params = cli.effect.to_parameters();
    info!("Effect parameters: {:?}", params);

    let mut source = depth_source(&cli, &pipeline)?;
    let result = pipeline
        .convert_file(&cli.input, &cli.output, source.as_mut(), &params)
        .with_context(|| format!("converting {}", cli.input.display()))?;

    if let Some(path) = &cli.depth_out {
        pipeline.write_depth_file(&result.depth, path)?;
    }

    if cli.timings {
        result.timings.log_summary();
    }

    info!(output = %cli.output.display(), "Done");
    Ok(())
}
