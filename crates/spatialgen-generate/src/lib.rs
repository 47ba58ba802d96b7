//! Distribution-driven spatial data generation for spatialgen.
//!
//! This crate turns a [`DatasetConfig`] into `card` points or rectangles
//! drawn from one of six distributions, applies the configured affine
//! transform, and writes the result as CSV or WKT with a deterministic,
//! seedable random source.

pub mod batch;
pub mod distributions;
pub mod engine;
pub mod errors;
pub mod model;
pub mod output;
pub mod parcel;
pub mod sampler;

pub use batch::{BatchConfig, run_batch};
pub use distributions::{Distribution, DistributionParams};
pub use engine::{Dataset, GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{DatasetConfig, GenerateOptions, GenerationReport};
