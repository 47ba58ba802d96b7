use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use spatialgen_core::{AffineTransform, GeometryKind, OutputFormat};

use crate::distributions::Distribution;
use crate::errors::GenerationError;
use crate::sampler::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_DIMENSIONS: usize = 2;
pub const DEFAULT_SPAN: [f64; 2] = [0.01, 0.01];

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Maximum consecutive rejected samples tolerated for a single point.
    pub max_attempts: u64,
    /// Write `<output>.report.json` next to the dataset.
    pub write_report: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            write_report: true,
        }
    }
}

/// Everything needed to produce one dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Number of geometries to emit.
    #[serde(alias = "card")]
    pub cardinality: u64,
    #[serde(default, alias = "geo")]
    pub geometry: GeometryKind,
    #[serde(default = "default_dimensions", alias = "dim")]
    pub dimensions: usize,
    pub distribution: Distribution,
    /// Width and height of the rectangle wrapped around each point.
    #[serde(default = "default_span")]
    pub span: [f64; 2],
    #[serde(default)]
    pub transform: AffineTransform,
    #[serde(default)]
    pub format: OutputFormat,
    /// Destination file; the format extension is appended when missing.
    pub output: PathBuf,
    /// Seed for the random source; drawn from OS entropy when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl DatasetConfig {
    pub fn new(cardinality: u64, distribution: Distribution, output: impl Into<PathBuf>) -> Self {
        Self {
            cardinality,
            geometry: GeometryKind::Point,
            dimensions: DEFAULT_DIMENSIONS,
            distribution,
            span: DEFAULT_SPAN,
            transform: AffineTransform::IDENTITY,
            format: OutputFormat::Csv,
            output: output.into(),
            seed: None,
        }
    }

    /// Rejects inconsistent configurations before any sampling happens.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.cardinality == 0 {
            return Err(GenerationError::InvalidConfig(
                "cardinality must be a positive integer".to_string(),
            ));
        }
        if self.dimensions == 0 {
            return Err(GenerationError::InvalidConfig(
                "dimensions must be at least 1".to_string(),
            ));
        }
        if self.geometry == GeometryKind::Rectangle
            && self.distribution.is_point_based()
            && self.dimensions < 2
        {
            return Err(GenerationError::InvalidConfig(format!(
                "rectangles need at least 2 dimensions, got {}",
                self.dimensions
            )));
        }
        if !self.distribution.is_point_based() && usize::try_from(self.cardinality).is_err() {
            return Err(GenerationError::InvalidConfig(format!(
                "parcel cardinality {} does not fit in memory",
                self.cardinality
            )));
        }
        self.distribution.validate(self.dimensions)?;

        let [width, height] = self.span;
        if !(width.is_finite() && height.is_finite() && width >= 0.0 && height >= 0.0) {
            return Err(GenerationError::InvalidConfig(format!(
                "rectangle span must be finite and non-negative, got ({width}, {height})"
            )));
        }
        if self
            .transform
            .coefficients
            .iter()
            .any(|value| !value.is_finite())
        {
            return Err(GenerationError::InvalidConfig(
                "affine coefficients must be finite".to_string(),
            ));
        }
        if self.output.as_os_str().is_empty() {
            return Err(GenerationError::InvalidConfig(
                "output path is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Output path with the format extension appended when it has none.
    pub fn output_path(&self) -> PathBuf {
        if self.output.extension().is_some() {
            self.output.clone()
        } else {
            self.output.with_extension(self.format.as_str())
        }
    }
}

/// Path of the JSON report written next to a dataset.
pub fn report_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".report.json");
    output.with_file_name(name)
}

fn default_dimensions() -> usize {
    DEFAULT_DIMENSIONS
}

fn default_span() -> [f64; 2] {
    DEFAULT_SPAN
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub generated_at: String,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub geometry: GeometryKind,
    pub distribution: Distribution,
    pub dimensions: usize,
    pub seed: u64,
    pub rows_requested: u64,
    pub rows_generated: u64,
    /// Candidates discarded by the unit-cube filter.
    pub rejected_samples: u64,
    pub acceptance_rate: f64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, config: &DatasetConfig, seed: u64) -> Self {
        Self {
            run_id,
            generated_at: chrono::Utc::now().to_rfc3339(),
            output: config.output_path(),
            format: config.format,
            geometry: effective_geometry(config),
            distribution: config.distribution,
            dimensions: config.dimensions,
            seed,
            rows_requested: config.cardinality,
            rows_generated: 0,
            rejected_samples: 0,
            acceptance_rate: 1.0,
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_sampling(&mut self, generated: u64, rejected: u64) {
        self.rows_generated = generated;
        self.rejected_samples = rejected;
        let attempts = generated + rejected;
        self.acceptance_rate = if attempts == 0 {
            1.0
        } else {
            generated as f64 / attempts as f64
        };
    }
}

/// Parcel always emits rectangles, whatever the configured geometry.
pub fn effective_geometry(config: &DatasetConfig) -> GeometryKind {
    if config.distribution.is_point_based() {
        config.geometry
    } else {
        GeometryKind::Rectangle
    }
}
