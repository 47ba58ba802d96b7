use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use spatialgen_core::{Geometry, GeometryKind, Point, Rectangle};

use crate::errors::GenerationError;
use crate::model::{
    DatasetConfig, GenerateOptions, GenerationReport, effective_geometry, report_path,
};
use crate::output::{DatasetWriter, staging_path};
use crate::parcel;
use crate::sampler::PointSampler;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub output: PathBuf,
    pub report_path: Option<PathBuf>,
    pub report: GenerationReport,
}

/// Geometries produced in memory, without touching the filesystem.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub geometries: Vec<Geometry>,
    /// Candidates discarded by the unit-cube filter.
    pub rejected: u64,
}

/// Entry point for generating datasets from a [`DatasetConfig`].
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Validates the config, generates the dataset and writes it to disk.
    ///
    /// Point distributions are streamed to a staging file next to the output
    /// as each point is accepted, and the file is renamed into place only once
    /// the run succeeds. A failed run leaves no dataset or report behind.
    pub fn run(&self, config: &DatasetConfig) -> Result<GenerationResult, GenerationError> {
        self.validate(config)?;
        let start = Instant::now();
        let run_id = uuid::Uuid::new_v4().to_string();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let output = config.output_path();

        if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!(
            run_id = %run_id,
            distribution = config.distribution.name(),
            geometry = %effective_geometry(config),
            cardinality = config.cardinality,
            dimensions = config.dimensions,
            seed,
            output = %output.display(),
            "generation started"
        );

        let mut report = GenerationReport::new(run_id.clone(), config, seed);
        let staging = staging_path(&output);
        let streamed = stream_to_file(&staging, config, self.options.max_attempts, &mut rng);
        let (rows, rejected, bytes) = match streamed {
            Ok(counts) => counts,
            Err(err) => {
                discard(&staging);
                warn!(run_id = %run_id, error = %err, "generation failed");
                return Err(err);
            }
        };
        report.record_sampling(rows, rejected);
        report.bytes_written = bytes;
        report.duration_ms = start.elapsed().as_millis() as u64;

        let report_path = if self.options.write_report {
            let path = report_path(&output);
            let report_staging = staging_path(&path);
            if let Err(err) = write_report(&report_staging, &report) {
                discard(&report_staging);
                discard(&staging);
                return Err(err);
            }
            std::fs::rename(&staging, &output)?;
            std::fs::rename(&report_staging, &path)?;
            Some(path)
        } else {
            std::fs::rename(&staging, &output)?;
            None
        };

        info!(
            run_id = %run_id,
            rows_generated = report.rows_generated,
            rejected_samples = report.rejected_samples,
            bytes_written = report.bytes_written,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult {
            output,
            report_path,
            report,
        })
    }

    /// Generates the dataset in memory using the caller's random source.
    ///
    /// `config.seed` and `config.output` are ignored.
    pub fn generate(
        &self,
        config: &DatasetConfig,
        rng: &mut impl Rng,
    ) -> Result<Dataset, GenerationError> {
        self.validate(config)?;
        let mut geometries = Vec::new();
        let rejected = emit(config, self.options.max_attempts, rng, |geometry| {
            geometries.push(geometry);
            Ok(())
        })?;
        Ok(Dataset {
            geometries,
            rejected,
        })
    }

    fn validate(&self, config: &DatasetConfig) -> Result<(), GenerationError> {
        if self.options.max_attempts == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        config.validate()?;
        if !config.distribution.is_point_based() && config.geometry == GeometryKind::Point {
            warn!(
                distribution = config.distribution.name(),
                "parcel always produces rectangles; ignoring geometry = point"
            );
        }
        if !config.distribution.is_point_based() && !config.transform.is_identity() {
            warn!(
                distribution = config.distribution.name(),
                "parcel output is not transformed; ignoring affine coefficients"
            );
        }
        Ok(())
    }
}

/// Writes the whole dataset to `path`; returns (rows, rejected, bytes).
fn stream_to_file<R: Rng>(
    path: &Path,
    config: &DatasetConfig,
    max_attempts: u64,
    rng: &mut R,
) -> Result<(u64, u64, u64), GenerationError> {
    let mut writer = DatasetWriter::create(path, config.format)?;
    let rejected = emit(config, max_attempts, rng, |geometry| writer.write(&geometry))?;
    let rows = writer.rows();
    let bytes = writer.finish()?;
    Ok((rows, rejected, bytes))
}

fn write_report(path: &Path, report: &GenerationReport) -> Result<(), GenerationError> {
    std::fs::write(path, serde_json::to_vec_pretty(report)?)?;
    Ok(())
}

/// Removes a staging file left by a failed run.
fn discard(path: &Path) {
    match std::fs::remove_file(path) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), error = %err, "failed to remove staging file");
        }
        _ => {}
    }
}

/// Produces every geometry of `config` into `sink`; returns the rejected count.
fn emit<R, F>(
    config: &DatasetConfig,
    max_attempts: u64,
    rng: &mut R,
    mut sink: F,
) -> Result<u64, GenerationError>
where
    R: Rng,
    F: FnMut(Geometry) -> Result<(), GenerationError>,
{
    match config.distribution {
        crate::Distribution::Parcel {
            split_range,
            dither,
        } => {
            let cardinality = usize::try_from(config.cardinality).map_err(|_| {
                GenerationError::InvalidConfig("parcel cardinality too large".to_string())
            })?;
            let mut boxes = parcel::partition(cardinality, split_range, rng);
            parcel::dither(&mut boxes, dither, rng);
            for rect in boxes {
                sink(Geometry::Rectangle(rect))?;
            }
            Ok(0)
        }
        distribution => {
            let mut sampler = PointSampler::new(
                distribution,
                config.cardinality,
                config.dimensions,
                max_attempts,
                rng,
            );
            for point in sampler.by_ref() {
                sink(place(point?, config)?)?;
            }
            Ok(sampler.rejected())
        }
    }
}

/// Applies the affine transform and wraps the point as configured.
///
/// The transformed point is not re-validated and may leave the unit square.
fn place(mut point: Point, config: &DatasetConfig) -> Result<Geometry, GenerationError> {
    config.transform.apply(&mut point);
    match config.geometry {
        GeometryKind::Point => Ok(Geometry::Point(point)),
        GeometryKind::Rectangle => {
            let [width, height] = config.span;
            Ok(Geometry::Rectangle(Rectangle::anchored_at(
                &point, width, height,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use spatialgen_core::AffineTransform;

    use super::*;
    use crate::Distribution;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn rectangles_are_anchored_at_transformed_points() {
        let mut config = DatasetConfig::new(50, Distribution::Uniform, "unused");
        config.geometry = GeometryKind::Rectangle;
        config.span = [0.5, 0.25];
        config.transform = AffineTransform::new([10.0, 0.0, 100.0, 0.0, 10.0, 200.0]);

        let dataset = GenerationEngine::default()
            .generate(&config, &mut rng(1))
            .expect("generate");
        assert_eq!(dataset.geometries.len(), 50);
        for geometry in &dataset.geometries {
            let Geometry::Rectangle(rect) = geometry else {
                panic!("expected rectangle");
            };
            assert!((100.0..=110.0).contains(&rect.x));
            assert!((200.0..=210.0).contains(&rect.y));
            assert_eq!(rect.w, 0.5);
            assert_eq!(rect.h, 0.25);
        }
    }

    #[test]
    fn transform_runs_after_acceptance_and_is_not_rechecked() {
        let mut config = DatasetConfig::new(200, Distribution::Gaussian, "unused");
        config.transform = AffineTransform::new([1.0, 0.0, 5.0, 0.0, 1.0, 5.0]);
        let dataset = GenerationEngine::default()
            .generate(&config, &mut rng(2))
            .expect("generate");
        assert_eq!(dataset.geometries.len(), 200);
        for geometry in &dataset.geometries {
            let Geometry::Point(point) = geometry else {
                panic!("expected point");
            };
            assert!(!point.is_in_unit_cube());
            assert!(point.coordinates.iter().all(|v| (5.0..=6.0).contains(v)));
        }
    }

    #[test]
    fn sierpinski_chaos_game_uses_untransformed_previous_points() {
        let mut plain = DatasetConfig::new(100, Distribution::Sierpinski, "unused");
        let plain_points = GenerationEngine::default()
            .generate(&plain, &mut rng(3))
            .expect("generate plain");

        plain.transform = AffineTransform::new([2.0, 0.0, 1.0, 0.0, 2.0, 1.0]);
        let moved_points = GenerationEngine::default()
            .generate(&plain, &mut rng(3))
            .expect("generate moved");

        assert_eq!(moved_points.rejected, 0);
        for (a, b) in plain_points
            .geometries
            .iter()
            .zip(&moved_points.geometries)
        {
            let (Geometry::Point(a), Geometry::Point(b)) = (a, b) else {
                panic!("expected points");
            };
            assert_eq!(b.coordinates[0], 2.0 * a.coordinates[0] + 1.0);
            assert_eq!(b.coordinates[1], 2.0 * a.coordinates[1] + 1.0);
        }
    }

    #[test]
    fn parcel_ignores_transform_and_geometry() {
        let mut config = DatasetConfig::new(
            4,
            Distribution::Parcel {
                split_range: 0.5,
                dither: 0.0,
            },
            "unused",
        );
        config.transform = AffineTransform::new([5.0, 0.0, 5.0, 0.0, 5.0, 5.0]);
        let dataset = GenerationEngine::default()
            .generate(&config, &mut rng(4))
            .expect("generate");
        assert_eq!(dataset.geometries.len(), 4);
        for geometry in &dataset.geometries {
            let Geometry::Rectangle(rect) = geometry else {
                panic!("expected rectangle");
            };
            assert!((rect.area() - 0.25).abs() < 1e-12);
            assert!(rect.max_x() <= 1.0 && rect.max_y() <= 1.0);
        }
    }

    #[test]
    fn zero_max_attempts_is_rejected_up_front() {
        let engine = GenerationEngine::new(GenerateOptions {
            max_attempts: 0,
            write_report: false,
        });
        let config = DatasetConfig::new(1, Distribution::Uniform, "unused");
        assert!(matches!(
            engine.generate(&config, &mut rng(5)),
            Err(GenerationError::InvalidConfig(_))
        ));
    }
}
