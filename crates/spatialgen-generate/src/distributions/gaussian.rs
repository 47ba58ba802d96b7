use rand::Rng;

use spatialgen_core::Point;

use super::random::normal;

pub(super) const MEAN: f64 = 0.5;
pub(super) const STD_DEV: f64 = 0.1;

/// Independent N(0.5, 0.1) coordinates; out-of-range samples are left for
/// the driver to reject.
pub(super) fn sample(dimensions: usize, rng: &mut impl Rng) -> Point {
    Point::new((0..dimensions).map(|_| normal(MEAN, STD_DEV, rng)).collect())
}
