use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use spatialgen_core::{Geometry, GeometryKind, OutputFormat};

use crate::errors::EvalError;

/// Axis-aligned bounding box of a dataset, one entry per axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

/// Machine-readable description of one dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub geometry: GeometryKind,
    pub format: OutputFormat,
    pub count: u64,
    pub dimensions: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Mean of the points, or of the rectangle centers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Vec<f64>>,
    /// Fraction of geometries lying entirely inside the unit square.
    pub inside_unit_square: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_area: Option<f64>,
}

impl DatasetMetrics {
    pub fn to_json_pretty(&self) -> Result<String, EvalError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads a dataset file written by the generator and summarizes it.
///
/// Blank lines are skipped. Any malformed line fails the whole read with
/// its 1-based line number.
pub fn describe(
    path: &Path,
    kind: GeometryKind,
    format: OutputFormat,
) -> Result<DatasetMetrics, EvalError> {
    let geometries = match format {
        OutputFormat::Csv => read_csv(path, kind)?,
        OutputFormat::Wkt => read_wkt(path, kind)?,
    };

    let mut metrics = describe_geometries(&geometries, kind, format)?;
    metrics.path = Some(path.to_path_buf());
    Ok(metrics)
}

fn read_csv(path: &Path, kind: GeometryKind) -> Result<Vec<Geometry>, EvalError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut geometries = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, |position| position.line());
        let geometry = Geometry::from_csv_fields(record.iter(), kind)
            .map_err(|source| EvalError::Core { line, source })?;
        geometries.push(geometry);
    }
    Ok(geometries)
}

fn read_wkt(path: &Path, kind: GeometryKind) -> Result<Vec<Geometry>, EvalError> {
    let reader = BufReader::new(File::open(path)?);
    let mut geometries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let geometry = Geometry::parse(&line, kind, OutputFormat::Wkt).map_err(|source| {
            EvalError::Core {
                line: index as u64 + 1,
                source,
            }
        })?;
        geometries.push(geometry);
    }
    Ok(geometries)
}

/// Summarizes geometries already in memory.
pub fn describe_geometries(
    geometries: &[Geometry],
    kind: GeometryKind,
    format: OutputFormat,
) -> Result<DatasetMetrics, EvalError> {
    let mut summary = Summary::default();
    for geometry in geometries {
        summary.add(geometry)?;
    }
    Ok(summary.finish(kind, format))
}

#[derive(Default)]
struct Summary {
    count: u64,
    inside: u64,
    min: Vec<f64>,
    max: Vec<f64>,
    sum: Vec<f64>,
    area: Option<f64>,
}

impl Summary {
    fn add(&mut self, geometry: &Geometry) -> Result<(), EvalError> {
        let (low, high, center, inside) = match geometry {
            Geometry::Point(point) => (
                point.coordinates.clone(),
                point.coordinates.clone(),
                point.coordinates.clone(),
                point.is_in_unit_cube(),
            ),
            Geometry::Rectangle(rect) => {
                *self.area.get_or_insert(0.0) += rect.area();
                let inside = rect.x >= 0.0
                    && rect.y >= 0.0
                    && rect.max_x() <= 1.0
                    && rect.max_y() <= 1.0;
                (
                    vec![rect.x, rect.y],
                    vec![rect.max_x(), rect.max_y()],
                    vec![rect.x + rect.w / 2.0, rect.y + rect.h / 2.0],
                    inside,
                )
            }
        };

        if self.count == 0 {
            self.min = low;
            self.max = high;
            self.sum = center;
        } else {
            if center.len() != self.sum.len() {
                return Err(EvalError::InvalidDataset(format!(
                    "geometry #{} has {} dimensions, expected {}",
                    self.count + 1,
                    center.len(),
                    self.sum.len()
                )));
            }
            for axis in 0..self.sum.len() {
                self.min[axis] = self.min[axis].min(low[axis]);
                self.max[axis] = self.max[axis].max(high[axis]);
                self.sum[axis] += center[axis];
            }
        }
        self.count += 1;
        if inside {
            self.inside += 1;
        }
        Ok(())
    }

    fn finish(self, kind: GeometryKind, format: OutputFormat) -> DatasetMetrics {
        let count = self.count;
        let (bounds, centroid, inside_unit_square) = if count == 0 {
            (None, None, 0.0)
        } else {
            let n = count as f64;
            (
                Some(Bounds {
                    min: self.min,
                    max: self.max,
                }),
                Some(self.sum.iter().map(|total| total / n).collect()),
                self.inside as f64 / n,
            )
        };
        let dimensions = centroid.as_ref().map_or(0, Vec::len);
        let mean_area = match self.area {
            Some(total) if count > 0 => Some(total / count as f64),
            _ => None,
        };

        DatasetMetrics {
            path: None,
            geometry: kind,
            format,
            count,
            dimensions,
            bounds,
            centroid,
            inside_unit_square,
            total_area: self.area,
            mean_area,
        }
    }
}
