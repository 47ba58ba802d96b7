use thiserror::Error;

/// Core error type shared across spatialgen crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Text could not be read back as a geometry.
    #[error("parse error: {0}")]
    Parse(String),
    /// A geometry violates its structural invariants.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
}

/// Convenience alias for results returned by spatialgen-core.
pub type Result<T> = std::result::Result<T, CoreError>;
