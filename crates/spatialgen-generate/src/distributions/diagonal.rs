use std::f64::consts::SQRT_2;

use rand::Rng;

use spatialgen_core::Point;

use super::random::{bernoulli, normal, uniform};

/// Points on or around the main diagonal.
///
/// With probability `percentage` every coordinate takes one shared uniform
/// draw. Otherwise a base `c` is perturbed by `d ~ N(0, buffer / 5)`, pushing
/// even and odd coordinates in opposite directions along the anti-diagonal.
pub(super) fn sample(
    percentage: f64,
    buffer: f64,
    dimensions: usize,
    rng: &mut impl Rng,
) -> Point {
    if bernoulli(percentage, rng) {
        let value = uniform(rng);
        return Point::new(vec![value; dimensions]);
    }

    let c = uniform(rng);
    let d = normal(0.0, buffer / 5.0, rng);
    Point::new(
        (0..dimensions)
            .map(|k| {
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                c + sign * d / SQRT_2
            })
            .collect(),
    )
}
