//! Summary statistics for generated spatial datasets.

pub mod errors;
pub mod metrics;

pub use errors::EvalError;
pub use metrics::{Bounds, DatasetMetrics, describe, describe_geometries};
