use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::Point;

/// 2x3 affine map applied to the first two coordinates of a point.
///
/// `x' = a0*x + a1*y + a2`, `y' = a3*x + a4*y + a5`.
///
/// The result is not clamped or re-validated: relocating data outside the
/// unit square is the point of the transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct AffineTransform {
    pub coefficients: [f64; 6],
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        coefficients: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    pub fn new(coefficients: [f64; 6]) -> Self {
        Self { coefficients }
    }

    /// Maps the unit square onto `[min_x, max_x] x [min_y, max_y]`.
    pub fn scale_to(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new([max_x - min_x, 0.0, min_x, 0.0, max_y - min_y, min_y])
    }

    /// Builds a transform from a slice, failing unless it has exactly six values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let coefficients: [f64; 6] = values.try_into().map_err(|_| {
            CoreError::Parse(format!(
                "affine transform needs 6 coefficients, got {}",
                values.len()
            ))
        })?;
        Ok(Self::new(coefficients))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Applies the map in place.
    ///
    /// A one-dimensional point only receives `x' = a0*x + a2`.
    pub fn apply(&self, point: &mut Point) {
        let [a0, a1, a2, a3, a4, a5] = self.coefficients;
        match point.coordinates.as_mut_slice() {
            [x, y, ..] => {
                let (x0, y0) = (*x, *y);
                *x = a0 * x0 + a1 * y0 + a2;
                *y = a3 * x0 + a4 * y0 + a5;
            }
            [x] => *x = a0 * *x + a2,
            [] => {}
        }
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[f64; 6]> for AffineTransform {
    fn from(value: [f64; 6]) -> Self {
        Self::new(value)
    }
}

impl From<AffineTransform> for [f64; 6] {
    fn from(value: AffineTransform) -> Self {
        value.coefficients
    }
}
