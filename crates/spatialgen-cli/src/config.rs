use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use spatialgen_core::{AffineTransform, GeometryKind, OutputFormat};
use spatialgen_generate::model::DEFAULT_SPAN;
use spatialgen_generate::{BatchConfig, DatasetConfig, Distribution, DistributionParams};

use crate::CliError;

/// Flat `generate` settings, shared by `--config` files and command-line flags.
///
/// Every field is optional so a file can hold defaults that individual flags
/// override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateSettings {
    #[serde(default, alias = "cardinality")]
    pub card: Option<u64>,
    #[serde(default, alias = "geometry")]
    pub geo: Option<GeometryKind>,
    #[serde(default, alias = "dimensions")]
    pub dim: Option<usize>,
    #[serde(default, alias = "distribution")]
    pub dist: Option<String>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub buffer: Option<f64>,
    #[serde(default, alias = "probability")]
    pub prob: Option<f64>,
    #[serde(default)]
    pub digits: Option<u32>,
    #[serde(default)]
    pub split_range: Option<f64>,
    #[serde(default)]
    pub dither: Option<f64>,
    #[serde(default, alias = "transform")]
    pub affine: Option<Vec<f64>>,
    #[serde(default)]
    pub span: Option<Vec<f64>>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_attempts: Option<u64>,
}

impl GenerateSettings {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Field-wise merge where values present in `flags` win.
    pub fn overridden_by(self, flags: GenerateSettings) -> GenerateSettings {
        GenerateSettings {
            card: flags.card.or(self.card),
            geo: flags.geo.or(self.geo),
            dim: flags.dim.or(self.dim),
            dist: flags.dist.or(self.dist),
            percentage: flags.percentage.or(self.percentage),
            buffer: flags.buffer.or(self.buffer),
            prob: flags.prob.or(self.prob),
            digits: flags.digits.or(self.digits),
            split_range: flags.split_range.or(self.split_range),
            dither: flags.dither.or(self.dither),
            affine: flags.affine.or(self.affine),
            span: flags.span.or(self.span),
            output: flags.output.or(self.output),
            format: flags.format.or(self.format),
            seed: flags.seed.or(self.seed),
            max_attempts: flags.max_attempts.or(self.max_attempts),
        }
    }

    /// Builds the dataset config; `card`, `dist` and `output` are required.
    pub fn to_dataset_config(&self) -> Result<DatasetConfig, CliError> {
        let cardinality = self.card.ok_or_else(|| missing("card"))?;
        let name = self.dist.as_deref().ok_or_else(|| missing("dist"))?;
        let output = self.output.clone().ok_or_else(|| missing("output"))?;

        let params = DistributionParams {
            percentage: self.percentage,
            buffer: self.buffer,
            probability: self.prob,
            digits: self.digits,
            split_range: self.split_range,
            dither: self.dither,
        };
        let distribution = Distribution::from_name(name, &params)?;

        let mut config = DatasetConfig::new(cardinality, distribution, output);
        if let Some(geo) = self.geo {
            config.geometry = geo;
        }
        if let Some(dim) = self.dim {
            config.dimensions = dim;
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(affine) = &self.affine {
            config.transform = AffineTransform::from_slice(affine)?;
        }
        config.span = match self.span.as_deref() {
            None => DEFAULT_SPAN,
            Some([width, height]) => [*width, *height],
            Some(other) => {
                return Err(CliError::InvalidConfig(format!(
                    "span needs 2 values (width,height), got {}",
                    other.len()
                )));
            }
        };
        config.seed = self.seed;
        Ok(config)
    }
}

pub fn load_batch(path: &Path) -> Result<BatchConfig, CliError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn missing(flag: &str) -> CliError {
    CliError::InvalidConfig(format!("--{flag} is required (flag or config file)"))
}
