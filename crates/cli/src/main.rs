use std::path::PathBuf;
use std::process;

use clap::Parser;

use vsr_dataset_core::config::{DatasetManifest, Method, ParserConfig, Scale};
use vsr_dataset_core::parser::Parser as DatasetParser;
use vsr_dataset_core::sampling::resample::ResampleFilter;
use vsr_dataset_core::sampling::sample::{FrameStack, Sample};
use vsr_dataset_core::sampling::slice::SampleSlice;
use vsr_dataset_core::shared::color_format::ColorFormat;
use vsr_dataset_core::source::domain::frame_source::FrameSource;

/// Inspect a super-resolution training dataset: sample counts, capacity,
/// and the shape of generated HR/LR windows.
#[derive(Parser)]
#[command(name = "vsr-dataset")]
struct Cli {
    /// Dataset manifest: JSON object mapping train/val/test/infer to source paths.
    manifest: PathBuf,

    /// Parser configuration JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset split: train, val, test or infer.
    #[arg(long)]
    method: Option<String>,

    /// Down-sampling factor (applied to both axes).
    #[arg(long)]
    scale: Option<f64>,

    /// Window depth in frames (negative = whole source).
    #[arg(long, allow_hyphen_values = true)]
    depth: Option<i32>,

    /// Crop HR frames to a multiple of the scale (true/false).
    #[arg(long)]
    modcrop: Option<bool>,

    /// Resampling kernel: nearest, bilinear, bicubic or lanczos.
    #[arg(long)]
    resample: Option<String>,

    /// Output color format: gray, ycbcr or rgb.
    #[arg(long)]
    convert_to: Option<String>,

    /// Generate the samples in this start:stop[:step] range and print their shapes.
    #[arg(long, allow_hyphen_values = true)]
    samples: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let manifest = DatasetManifest::from_json_file(&cli.manifest)?;
    let parser = DatasetParser::from_manifest(&manifest, config)?;
    log::info!(
        "Loaded {} sources from {}",
        parser.sources().len(),
        cli.manifest.display()
    );

    print_summary(&parser);

    if let Some(range) = &cli.samples {
        let slice: SampleSlice = range.parse()?;
        for (i, sample) in parser.slice(slice)?.iter().enumerate() {
            print_sample(i, sample);
        }
    }

    Ok(())
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.manifest.exists() {
        return Err(format!("Manifest not found: {}", cli.manifest.display()).into());
    }
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
    }
    if let Some(scale) = cli.scale {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(format!("Scale must be a positive number, got {scale}").into());
        }
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<ParserConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_json_file(path)?,
        None => ParserConfig::default(),
    };
    if let Some(method) = &cli.method {
        config.method = method.parse::<Method>()?;
    }
    if let Some(scale) = cli.scale {
        config.scale = Scale::uniform(scale)?;
    }
    if let Some(depth) = cli.depth {
        config.depth = depth;
    }
    if let Some(modcrop) = cli.modcrop {
        config.modcrop = modcrop;
    }
    if let Some(resample) = &cli.resample {
        config.resample = resample.parse::<ResampleFilter>()?;
    }
    if let Some(name) = &cli.convert_to {
        config.color_format = ColorFormat::resolve(name);
    }
    Ok(config)
}

fn print_summary(parser: &DatasetParser) {
    let config = parser.config();
    println!(
        "method={} scale={:?} depth={} modcrop={} resample={} color={}",
        config.method,
        config.scale.as_pair(),
        config.depth,
        config.modcrop,
        config.resample,
        parser.color_format()
    );
    for (source, count) in parser.sources().iter().zip(parser.samples_per_source()) {
        let (width, height) = source.frame_shape();
        println!(
            "  {}: {} frames, {}x{}, {} samples",
            source.name(),
            source.frame_count(),
            width,
            height,
            count
        );
    }
    println!("samples: {}", parser.len());
    println!("capacity: {} bytes ({:.1} MiB)", parser.capacity(), mib(parser.capacity()));
}

fn print_sample(i: usize, sample: &Sample) {
    println!(
        "[{i}] {} @{} of {}: hr {} lr {}",
        sample.metadata.source_name,
        sample.metadata.offset,
        sample.metadata.source_frames,
        describe(&sample.hr),
        describe(&sample.lr)
    );
}

fn describe(stack: &FrameStack) -> String {
    match stack.frames().first() {
        Some(f) => format!(
            "{}x{}x{}x{}",
            stack.depth(),
            f.height(),
            f.width(),
            f.channels()
        ),
        None => "empty".to_string(),
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
