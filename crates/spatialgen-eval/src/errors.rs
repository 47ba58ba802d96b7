use thiserror::Error;

use spatialgen_core::CoreError;

/// Errors emitted while reading a dataset back.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("line {line}: {source}")]
    Core {
        line: u64,
        #[source]
        source: CoreError,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
