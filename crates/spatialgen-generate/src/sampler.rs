//! Rejection-sampling driver shared by the point distributions.

use rand::Rng;
use tracing::debug;

use spatialgen_core::Point;

use crate::distributions::Distribution;
use crate::errors::GenerationError;

/// Default budget of consecutive rejections tolerated for a single point.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Streams accepted points, rejecting candidates outside the unit cube.
///
/// Each accepted point becomes the `previous` input of the next draw. When
/// `max_attempts` candidates in a row are rejected the iterator yields
/// [`GenerationError::Unsatisfiable`] and stops.
pub struct PointSampler<'a, R: Rng> {
    distribution: Distribution,
    cardinality: u64,
    dimensions: usize,
    max_attempts: u64,
    rng: &'a mut R,
    previous: Option<Point>,
    accepted: u64,
    rejected: u64,
    failed: bool,
}

impl<'a, R: Rng> PointSampler<'a, R> {
    pub fn new(
        distribution: Distribution,
        cardinality: u64,
        dimensions: usize,
        max_attempts: u64,
        rng: &'a mut R,
    ) -> Self {
        Self {
            distribution,
            cardinality,
            dimensions,
            max_attempts,
            rng,
            previous: None,
            accepted: 0,
            rejected: 0,
            failed: false,
        }
    }

    /// Total number of rejected candidates so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    fn next_point(&mut self) -> Result<Point, GenerationError> {
        let mut attempts = 0_u64;
        loop {
            let candidate = self.distribution.sample(
                self.accepted,
                self.previous.as_ref(),
                self.dimensions,
                &mut *self.rng,
            )?;
            if candidate.is_in_unit_cube() {
                self.previous = Some(candidate.clone());
                self.accepted += 1;
                return Ok(candidate);
            }

            attempts += 1;
            self.rejected += 1;
            if attempts >= self.max_attempts {
                debug!(
                    distribution = self.distribution.name(),
                    accepted = self.accepted,
                    attempts,
                    "rejection budget exhausted"
                );
                return Err(GenerationError::Unsatisfiable {
                    distribution: self.distribution.name(),
                    accepted: self.accepted,
                    attempts,
                });
            }
        }
    }
}

impl<R: Rng> Iterator for PointSampler<'_, R> {
    type Item = Result<Point, GenerationError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.accepted >= self.cardinality {
            return None;
        }
        let result = self.next_point();
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.cardinality.saturating_sub(self.accepted)).ok();
        (0, remaining)
    }
}

/// Collects exactly `cardinality` accepted points (before any transform).
pub fn sample_points(
    distribution: Distribution,
    cardinality: u64,
    dimensions: usize,
    max_attempts: u64,
    rng: &mut impl Rng,
) -> Result<Vec<Point>, GenerationError> {
    PointSampler::new(distribution, cardinality, dimensions, max_attempts, rng).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn sample(distribution: Distribution, cardinality: u64) -> Vec<Point> {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        sample_points(
            distribution,
            cardinality,
            2,
            DEFAULT_MAX_ATTEMPTS,
            &mut rng,
        )
        .expect("sample points")
    }

    #[test]
    fn uniform_yields_exactly_card_points_in_range() {
        let points = sample(Distribution::Uniform, 5);
        assert_eq!(points.len(), 5);
        assert!(points.iter().all(Point::is_in_unit_cube));
    }

    #[test]
    fn every_point_distribution_respects_the_unit_cube() {
        let distributions = [
            Distribution::Uniform,
            Distribution::Diagonal {
                percentage: 0.3,
                buffer: 0.8,
            },
            Distribution::Gaussian,
            Distribution::Sierpinski,
            Distribution::Bit {
                probability: 0.7,
                digits: 6,
            },
        ];
        for distribution in distributions {
            let points = sample(distribution, 2_000);
            assert_eq!(points.len(), 2_000, "{}", distribution.name());
            assert!(
                points.iter().all(Point::is_in_unit_cube),
                "{} produced a point outside [0,1]",
                distribution.name()
            );
        }
    }

    #[test]
    fn sierpinski_starts_with_the_triangle_vertices() {
        let points = sample(Distribution::Sierpinski, 3);
        assert_eq!(points[0].coordinates, vec![0.0, 0.0]);
        assert_eq!(points[1].coordinates, vec![1.0, 0.0]);
        assert_eq!(points[2].coordinates, vec![0.5, 3.0_f64.sqrt() / 2.0]);
    }

    #[test]
    fn sierpinski_points_stay_inside_the_triangle() {
        let points = sample(Distribution::Sierpinski, 1_000);
        let apex = 3.0_f64.sqrt() / 2.0;
        for point in &points {
            let [x, y] = point.coordinates.as_slice() else {
                panic!("expected 2 coordinates");
            };
            let edge = apex * 2.0 * x.min(1.0 - x);
            assert!(*y <= edge + 1e-9, "({x}, {y}) above triangle");
        }
    }

    #[test]
    fn rejected_candidates_are_counted() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut sampler = PointSampler::new(
            Distribution::Diagonal {
                percentage: 0.0,
                buffer: 5.0,
            },
            200,
            2,
            DEFAULT_MAX_ATTEMPTS,
            &mut rng,
        );
        let points: Vec<Point> = sampler
            .by_ref()
            .collect::<Result<_, _>>()
            .expect("sample");
        assert_eq!(points.len(), 200);
        assert_eq!(sampler.accepted(), 200);
        assert!(sampler.rejected() > 0);
    }

    #[test]
    fn unsatisfiable_parameters_fail_instead_of_spinning() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let result = sample_points(
            Distribution::Diagonal {
                percentage: 0.0,
                buffer: 1e9,
            },
            10,
            2,
            1_000,
            &mut rng,
        );
        match result {
            Err(GenerationError::Unsatisfiable {
                distribution,
                attempts,
                ..
            }) => {
                assert_eq!(distribution, "diagonal");
                assert_eq!(attempts, 1_000);
            }
            other => panic!("expected unsatisfiable error, got {other:?}"),
        }
    }

    #[test]
    fn iterator_stops_after_an_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sampler = PointSampler::new(
            Distribution::Diagonal {
                percentage: 0.0,
                buffer: 1e9,
            },
            10,
            2,
            10,
            &mut rng,
        );
        assert!(matches!(sampler.next(), Some(Err(_))));
        assert!(sampler.next().is_none());
    }

    #[test]
    fn zero_cardinality_yields_nothing() {
        assert!(sample(Distribution::Uniform, 0).is_empty());
    }

    #[test]
    fn same_seed_same_points() {
        let a = sample(Distribution::Gaussian, 100);
        let b = sample(Distribution::Gaussian, 100);
        assert_eq!(a, b);
    }
}
