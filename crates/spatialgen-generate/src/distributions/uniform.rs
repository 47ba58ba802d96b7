use rand::Rng;

use spatialgen_core::Point;

use super::random::uniform;

/// `dimensions` independent uniform draws in [0, 1).
pub(super) fn sample(dimensions: usize, rng: &mut impl Rng) -> Point {
    Point::new((0..dimensions).map(|_| uniform(rng)).collect())
}
