mod config;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spatialgen_core::{CoreError, GeometryKind, OutputFormat};
use spatialgen_eval::{EvalError, describe};
use spatialgen_generate::{GenerateOptions, GenerationEngine, GenerationError, run_batch};
use thiserror::Error;

use config::{GenerateSettings, load_batch};
use logging::init_logging;

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Generation(#[from] GenerationError),
    #[error("{0}")]
    Eval(#[from] EvalError),
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "spatialgen", version, about = "Synthetic spatial dataset generator")]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one dataset.
    Generate(GenerateArgs),
    /// Generate every [[dataset]] listed in a TOML file.
    Batch(BatchArgs),
    /// Print summary statistics of a dataset file as JSON.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of geometries to generate.
    #[arg(long)]
    card: Option<u64>,
    /// Geometry type: point or rectangle.
    #[arg(long)]
    geo: Option<GeometryKind>,
    /// Number of coordinates per point.
    #[arg(long)]
    dim: Option<usize>,
    /// uniform, diagonal, gaussian, sierpinski, bit or parcel.
    #[arg(long)]
    dist: Option<String>,
    /// Diagonal: fraction of points exactly on the diagonal.
    #[arg(long)]
    percentage: Option<f64>,
    /// Diagonal: spread of the off-diagonal points.
    #[arg(long)]
    buffer: Option<f64>,
    /// Bit: probability that a bit is set.
    #[arg(long)]
    prob: Option<f64>,
    /// Bit: number of bits per coordinate.
    #[arg(long)]
    digits: Option<u32>,
    /// Parcel: minimum split fraction, in [0, 0.5].
    #[arg(long)]
    split_range: Option<f64>,
    /// Parcel: maximum fraction each box shrinks by.
    #[arg(long)]
    dither: Option<f64>,
    /// Affine coefficients a0,a1,a2,a3,a4,a5 applied as x' = a0x+a1y+a2, y' = a3x+a4y+a5.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, value_name = "A0,..,A5")]
    affine: Option<Vec<f64>>,
    /// Rectangle width and height around each point.
    #[arg(long, value_delimiter = ',', value_name = "W,H")]
    span: Option<Vec<f64>>,
    /// Output file; the format extension is appended when missing.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format: csv or wkt.
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Consecutive rejected samples tolerated for a single point.
    #[arg(long)]
    max_attempts: Option<u64>,
    /// TOML file with default values; flags override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Skip writing <output>.report.json.
    #[arg(long, default_value_t = false)]
    no_report: bool,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// TOML file with [[dataset]] tables.
    file: PathBuf,
    /// Consecutive rejected samples tolerated for a single point.
    #[arg(long)]
    max_attempts: Option<u64>,
    /// Skip writing the per-dataset reports.
    #[arg(long, default_value_t = false)]
    no_report: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Dataset file to describe.
    file: PathBuf,
    /// Geometry type stored in the file.
    #[arg(long, default_value_t = GeometryKind::Point)]
    geo: GeometryKind,
    /// File format; inferred from the extension when omitted.
    #[arg(long)]
    format: Option<OutputFormat>,
}

impl GenerateArgs {
    fn settings(&self) -> GenerateSettings {
        GenerateSettings {
            card: self.card,
            geo: self.geo,
            dim: self.dim,
            dist: self.dist.clone(),
            percentage: self.percentage,
            buffer: self.buffer,
            prob: self.prob,
            digits: self.digits,
            split_range: self.split_range,
            dither: self.dither,
            affine: self.affine.clone(),
            span: self.span.clone(),
            output: self.output.clone(),
            format: self.format,
            seed: self.seed,
            max_attempts: self.max_attempts,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_json)?;

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Batch(args) => run_batch_file(args),
        Command::Stats(args) => run_stats(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let file = match &args.config {
        Some(path) => GenerateSettings::load(path)?,
        None => GenerateSettings::default(),
    };
    let settings = file.overridden_by(args.settings());
    let config = settings.to_dataset_config()?;

    let engine = GenerationEngine::new(engine_options(settings.max_attempts, args.no_report));
    let result = engine.run(&config)?;

    println!("output={}", result.output.display());
    if let Some(report_path) = result.report_path {
        println!("report={}", report_path.display());
    }
    Ok(())
}

fn run_batch_file(args: BatchArgs) -> Result<(), CliError> {
    let batch = load_batch(&args.file)?;
    let engine = GenerationEngine::new(engine_options(args.max_attempts, args.no_report));
    for result in run_batch(&engine, &batch)? {
        println!("output={}", result.output.display());
    }
    Ok(())
}

fn run_stats(args: StatsArgs) -> Result<(), CliError> {
    let format = match args.format {
        Some(format) => format,
        None => infer_format(&args.file)?,
    };
    let metrics = describe(&args.file, args.geo, format)?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}

fn engine_options(max_attempts: Option<u64>, no_report: bool) -> GenerateOptions {
    let defaults = GenerateOptions::default();
    GenerateOptions {
        max_attempts: max_attempts.unwrap_or(defaults.max_attempts),
        write_report: !no_report,
    }
}

fn infer_format(path: &std::path::Path) -> Result<OutputFormat, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            CliError::InvalidConfig(format!(
                "cannot infer the format of {}; pass --format",
                path.display()
            ))
        })?;
    Ok(extension.parse()?)
}
