//! Core contracts for spatialgen.
//!
//! This crate defines the geometry model shared by the generator, the
//! dataset inspector and the CLI: points, rectangles, the affine transform
//! applied after sampling, and the CSV/WKT text encodings.

pub mod error;
pub mod format;
pub mod geometry;
pub mod transform;

pub use error::{CoreError, Result};
pub use format::{GeometryKind, OutputFormat};
pub use geometry::{Geometry, Point, Rectangle};
pub use transform::AffineTransform;
