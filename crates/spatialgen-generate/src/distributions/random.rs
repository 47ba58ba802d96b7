//! Scalar draws shared by the distributions.
//!
//! Every helper consumes a fixed number of uniform draws so that a given
//! seed always walks the random stream the same way.

use std::f64::consts::PI;

use rand::Rng;

/// Uniform draw in [0, 1).
pub fn uniform(rng: &mut impl Rng) -> f64 {
    rng.random::<f64>()
}

/// Uniform draw in [low, high); returns `low` when the bounds coincide.
pub fn uniform_between(low: f64, high: f64, rng: &mut impl Rng) -> f64 {
    low + (high - low) * uniform(rng)
}

/// One Bernoulli trial with success probability `p`.
pub fn bernoulli(p: f64, rng: &mut impl Rng) -> bool {
    uniform(rng) < p
}

/// Box-Muller gaussian sample. Two uniform draws per call; the cosine
/// companion is discarded.
///
/// A first draw of exactly 0 yields a non-finite value, which the sampling
/// driver rejects like any other out-of-range sample.
pub fn normal(mu: f64, sigma: f64, rng: &mut impl Rng) -> f64 {
    let u1 = uniform(rng);
    let u2 = uniform(rng);
    mu + sigma * (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin()
}

/// Fair die roll in `1..=faces`.
pub fn dice(faces: u32, rng: &mut impl Rng) -> u32 {
    (uniform(rng) * f64::from(faces)).floor() as u32 + 1
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn uniform_between_collapses_to_low_for_equal_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(uniform_between(0.5, 0.5, &mut rng), 0.5);
        }
    }

    #[test]
    fn dice_covers_all_faces() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen = [0_u32; 5];
        for _ in 0..5_000 {
            let face = dice(5, &mut rng);
            assert!((1..=5).contains(&face), "face {face} out of range");
            seen[(face - 1) as usize] += 1;
        }
        assert!(seen.iter().all(|count| *count > 800), "uneven faces: {seen:?}");
    }

    #[test]
    fn bernoulli_respects_extremes() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1_000 {
            assert!(bernoulli(1.0, &mut rng));
            assert!(!bernoulli(0.0, &mut rng));
        }
    }

    #[test]
    fn normal_consumes_two_draws_per_sample() {
        let mut sampled = ChaCha8Rng::seed_from_u64(9);
        let mut counted = ChaCha8Rng::seed_from_u64(9);
        normal(0.0, 1.0, &mut sampled);
        uniform(&mut counted);
        uniform(&mut counted);
        assert_eq!(uniform(&mut sampled), uniform(&mut counted));
    }

    #[test]
    fn normal_centers_on_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let samples: Vec<f64> = (0..20_000)
            .map(|_| normal(0.5, 0.1, &mut rng))
            .filter(|value| value.is_finite())
            .collect();
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
        assert!((variance.sqrt() - 0.1).abs() < 0.01, "stddev {}", variance.sqrt());
    }
}
