use thiserror::Error;

use spatialgen_core::CoreError;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(
        "distribution '{distribution}' parameters yield an unsatisfiable acceptance rate: \
         {attempts} consecutive samples rejected after {accepted} accepted"
    )]
    Unsatisfiable {
        distribution: &'static str,
        accepted: u64,
        attempts: u64,
    },
    #[error("geometry error: {0}")]
    Geometry(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
