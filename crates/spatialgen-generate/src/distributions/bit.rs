use rand::Rng;

use spatialgen_core::Point;

use super::random::bernoulli;

/// Coordinates built bit by bit: bit `i` (1-indexed) is a Bernoulli(`probability`)
/// trial weighted by `2^-i`, so every value is a multiple of `2^-digits`.
pub(super) fn sample(
    probability: f64,
    digits: u32,
    dimensions: usize,
    rng: &mut impl Rng,
) -> Point {
    Point::new(
        (0..dimensions)
            .map(|_| quantized(probability, digits, rng))
            .collect(),
    )
}

fn quantized(probability: f64, digits: u32, rng: &mut impl Rng) -> f64 {
    let mut value = 0.0;
    let mut weight = 1.0;
    for _ in 0..digits {
        weight /= 2.0;
        if bernoulli(probability, rng) {
            value += weight;
        }
    }
    value
}
