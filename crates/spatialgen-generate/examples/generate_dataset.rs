use std::env;
use std::path::PathBuf;

use spatialgen_generate::{
    DatasetConfig, Distribution, DistributionParams, GenerateOptions, GenerationEngine,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut dist: Option<String> = None;
    let mut card: u64 = 1000;
    let mut out: Option<PathBuf> = None;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dist" => dist = args.next(),
            "--card" => card = args.next().ok_or("missing --card value")?.parse()?,
            "--out" => out = args.next().map(PathBuf::from),
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let dist = dist.unwrap_or_else(|| "uniform".to_string());
    let distribution = Distribution::from_name(&dist, &DistributionParams::default())?;
    let out = out.unwrap_or_else(|| PathBuf::from(&dist));

    let mut config = DatasetConfig::new(card, distribution, out);
    config.seed = seed;

    let engine = GenerationEngine::new(GenerateOptions::default());
    let result = engine.run(&config)?;

    println!("output={}", result.output.display());
    Ok(())
}
