//! The six dataset distributions.
//!
//! Five of them produce one candidate point per call and share the
//! rejection-sampling driver in [`crate::sampler`]. `Parcel` instead
//! partitions the unit square directly (see [`crate::parcel`]).

mod bit;
mod diagonal;
mod gaussian;
pub mod random;
mod sierpinski;
mod uniform;

use rand::Rng;
use serde::{Deserialize, Serialize};

use spatialgen_core::Point;

use crate::errors::GenerationError;

pub const DEFAULT_PERCENTAGE: f64 = 0.5;
pub const DEFAULT_BUFFER: f64 = 0.5;
pub const DEFAULT_PROBABILITY: f64 = 0.2;
pub const DEFAULT_DIGITS: u32 = 10;
pub const DEFAULT_SPLIT_RANGE: f64 = 0.2;
pub const DEFAULT_DITHER: f64 = 0.2;

/// Largest bit depth whose coordinates stay exact in an `f64` mantissa.
pub const MAX_DIGITS: u32 = 52;

/// Distribution selector with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Distribution {
    Uniform,
    Diagonal {
        percentage: f64,
        buffer: f64,
    },
    Gaussian,
    #[serde(alias = "sierpinsky")]
    Sierpinski,
    Bit {
        #[serde(alias = "prob")]
        probability: f64,
        digits: u32,
    },
    Parcel {
        split_range: f64,
        dither: f64,
    },
}

/// Loose distribution parameters, as collected from flags or config files.
///
/// Missing values fall back to the `DEFAULT_*` constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionParams {
    pub percentage: Option<f64>,
    pub buffer: Option<f64>,
    pub probability: Option<f64>,
    pub digits: Option<u32>,
    pub split_range: Option<f64>,
    pub dither: Option<f64>,
}

impl Distribution {
    pub const NAMES: [&'static str; 6] = [
        "uniform",
        "diagonal",
        "gaussian",
        "sierpinski",
        "bit",
        "parcel",
    ];

    /// Resolves a distribution by name. `sierpinsky` is accepted as an alias.
    pub fn from_name(name: &str, params: &DistributionParams) -> Result<Self, GenerationError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Distribution::Uniform),
            "diagonal" => Ok(Distribution::Diagonal {
                percentage: params.percentage.unwrap_or(DEFAULT_PERCENTAGE),
                buffer: params.buffer.unwrap_or(DEFAULT_BUFFER),
            }),
            "gaussian" => Ok(Distribution::Gaussian),
            "sierpinski" | "sierpinsky" => Ok(Distribution::Sierpinski),
            "bit" => Ok(Distribution::Bit {
                probability: params.probability.unwrap_or(DEFAULT_PROBABILITY),
                digits: params.digits.unwrap_or(DEFAULT_DIGITS),
            }),
            "parcel" => Ok(Distribution::Parcel {
                split_range: params.split_range.unwrap_or(DEFAULT_SPLIT_RANGE),
                dither: params.dither.unwrap_or(DEFAULT_DITHER),
            }),
            other => Err(GenerationError::InvalidConfig(format!(
                "unknown distribution '{other}' (expected one of {})",
                Self::NAMES.join(", ")
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Uniform => "uniform",
            Distribution::Diagonal { .. } => "diagonal",
            Distribution::Gaussian => "gaussian",
            Distribution::Sierpinski => "sierpinski",
            Distribution::Bit { .. } => "bit",
            Distribution::Parcel { .. } => "parcel",
        }
    }

    /// True for the distributions driven by the rejection-sampling loop.
    pub fn is_point_based(&self) -> bool {
        !matches!(self, Distribution::Parcel { .. })
    }

    /// Checks parameter ranges and dimensionality before any sampling.
    pub fn validate(&self, dimensions: usize) -> Result<(), GenerationError> {
        match *self {
            Distribution::Uniform | Distribution::Gaussian => Ok(()),
            Distribution::Diagonal { percentage, buffer } => {
                check_unit_interval("diagonal percentage", percentage)?;
                if !(buffer.is_finite() && buffer > 0.0) {
                    return Err(GenerationError::InvalidConfig(format!(
                        "diagonal buffer must be > 0, got {buffer}"
                    )));
                }
                Ok(())
            }
            Distribution::Sierpinski => {
                if dimensions != 2 {
                    return Err(GenerationError::InvalidConfig(format!(
                        "sierpinski is only defined in 2 dimensions, got {dimensions}"
                    )));
                }
                Ok(())
            }
            Distribution::Bit {
                probability,
                digits,
            } => {
                check_unit_interval("bit probability", probability)?;
                if !(1..=MAX_DIGITS).contains(&digits) {
                    return Err(GenerationError::InvalidConfig(format!(
                        "bit digits must be between 1 and {MAX_DIGITS}, got {digits}"
                    )));
                }
                Ok(())
            }
            Distribution::Parcel {
                split_range,
                dither,
            } => {
                if !(0.0..=0.5).contains(&split_range) {
                    return Err(GenerationError::InvalidConfig(format!(
                        "parcel split_range must be between 0 and 0.5, got {split_range}"
                    )));
                }
                check_unit_interval("parcel dither", dither)?;
                if dimensions != 2 {
                    return Err(GenerationError::InvalidConfig(format!(
                        "parcel partitions the unit square and needs 2 dimensions, got {dimensions}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Draws one candidate point for accepted-index `index`.
    ///
    /// The candidate may fall outside the unit cube; filtering is the
    /// driver's job. `previous` is the last accepted point, if any.
    pub fn sample(
        &self,
        index: u64,
        previous: Option<&Point>,
        dimensions: usize,
        rng: &mut impl Rng,
    ) -> Result<Point, GenerationError> {
        match *self {
            Distribution::Uniform => Ok(uniform::sample(dimensions, rng)),
            Distribution::Diagonal { percentage, buffer } => {
                Ok(diagonal::sample(percentage, buffer, dimensions, rng))
            }
            Distribution::Gaussian => Ok(gaussian::sample(dimensions, rng)),
            Distribution::Sierpinski => sierpinski::sample(index, previous, rng).ok_or_else(|| {
                GenerationError::InvalidConfig(format!(
                    "sierpinski step {index} needs a previous point"
                ))
            }),
            Distribution::Bit {
                probability,
                digits,
            } => Ok(bit::sample(probability, digits, dimensions, rng)),
            Distribution::Parcel { .. } => Err(GenerationError::InvalidConfig(
                "parcel partitions space and does not sample points".to_string(),
            )),
        }
    }
}

fn check_unit_interval(label: &str, value: f64) -> Result<(), GenerationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GenerationError::InvalidConfig(format!(
            "{label} must be between 0 and 1, got {value}"
        )))
    }
}
