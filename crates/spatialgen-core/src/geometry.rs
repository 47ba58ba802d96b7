use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::format::{GeometryKind, OutputFormat};

/// A point with `dim` real-valued coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub coordinates: Vec<f64>,
}

impl Point {
    pub fn new(coordinates: Vec<f64>) -> Self {
        Self { coordinates }
    }

    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    /// True when every coordinate lies in the closed interval [0, 1].
    ///
    /// NaN coordinates never satisfy the check.
    pub fn is_in_unit_cube(&self) -> bool {
        self.coordinates
            .iter()
            .all(|value| (0.0..=1.0).contains(value))
    }

    /// Coordinate-wise midpoint; extra coordinates of the longer point are dropped.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new(
            self.coordinates
                .iter()
                .zip(&other.coordinates)
                .map(|(a, b)| (a + b) / 2.0)
                .collect(),
        )
    }

    pub fn to_csv(&self) -> String {
        join_numbers(&self.coordinates, ",")
    }

    pub fn to_wkt(&self) -> String {
        format!("POINT ({})", join_numbers(&self.coordinates, " "))
    }
}

/// Axis-aligned rectangle spanning `[x, x + w] x [y, y + h]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rectangle {
    /// The unit square `[0, 1] x [0, 1]`.
    pub const UNIT: Rectangle = Rectangle {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Wraps a point into a rectangle anchored at its first two coordinates.
    pub fn anchored_at(point: &Point, width: f64, height: f64) -> Result<Self> {
        match point.coordinates.as_slice() {
            [x, y, ..] => Ok(Self::new(*x, *y, width, height)),
            _ => Err(CoreError::InvalidGeometry(format!(
                "rectangle needs a point with at least 2 coordinates, got {}",
                point.dimensions()
            ))),
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// True when the interiors of both rectangles intersect with positive area.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rectangle, tolerance: f64) -> bool {
        let overlap_w = self.max_x().min(other.max_x()) - self.x.max(other.x);
        let overlap_h = self.max_y().min(other.max_y()) - self.y.max(other.y);
        overlap_w > tolerance && overlap_h > tolerance
    }

    /// Lower-left and upper-right corners as `[x1, y1, x2, y2]`.
    pub fn corners(&self) -> [f64; 4] {
        [self.x, self.y, self.max_x(), self.max_y()]
    }

    pub fn to_csv(&self) -> String {
        join_numbers(&self.corners(), ",")
    }

    /// Closed counter-clockwise ring starting at the lower-left corner.
    pub fn to_wkt(&self) -> String {
        let (x1, y1, x2, y2) = (self.x, self.y, self.max_x(), self.max_y());
        format!("POLYGON (({x1} {y1}, {x2} {y1}, {x2} {y2}, {x1} {y2}, {x1} {y1}))")
    }
}

/// A generated geometry, the unit of serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Point(Point),
    Rectangle(Rectangle),
}

impl Geometry {
    /// Values of one CSV record: point coordinates, or rectangle corners.
    pub fn csv_values(&self) -> Vec<f64> {
        match self {
            Geometry::Point(point) => point.coordinates.clone(),
            Geometry::Rectangle(rect) => rect.corners().to_vec(),
        }
    }

    pub fn to_csv(&self) -> String {
        join_numbers(&self.csv_values(), ",")
    }

    pub fn to_wkt(&self) -> String {
        match self {
            Geometry::Point(point) => point.to_wkt(),
            Geometry::Rectangle(rect) => rect.to_wkt(),
        }
    }

    /// Builds a geometry from the fields of one CSV record.
    ///
    /// The kind is required because a 4-D point and a rectangle share the
    /// same shape.
    pub fn from_csv_fields<'a>(
        fields: impl IntoIterator<Item = &'a str>,
        kind: GeometryKind,
    ) -> Result<Geometry> {
        let values = parse_numbers(fields.into_iter())?;
        match kind {
            GeometryKind::Point => Ok(Geometry::Point(Point::new(values))),
            GeometryKind::Rectangle => match values.as_slice() {
                [x1, y1, x2, y2] => Ok(Geometry::Rectangle(Rectangle::from_corners(
                    *x1, *y1, *x2, *y2,
                ))),
                other => Err(CoreError::Parse(format!(
                    "rectangle csv needs 4 values, got {}",
                    other.len()
                ))),
            },
        }
    }

    /// Reads one serialized line back into a geometry.
    ///
    /// WKT lines carry their own tag; a polygon is read back as its bounding
    /// rectangle.
    pub fn parse(line: &str, kind: GeometryKind, format: OutputFormat) -> Result<Geometry> {
        let line = line.trim();
        match format {
            OutputFormat::Csv => Self::from_csv_fields(line.split(','), kind),
            OutputFormat::Wkt => parse_wkt(line),
        }
    }
}

impl From<Point> for Geometry {
    fn from(value: Point) -> Self {
        Geometry::Point(value)
    }
}

impl From<Rectangle> for Geometry {
    fn from(value: Rectangle) -> Self {
        Geometry::Rectangle(value)
    }
}

fn join_numbers(values: &[f64], separator: &str) -> String {
    values
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

fn parse_numbers<'a>(parts: impl Iterator<Item = &'a str>) -> Result<Vec<f64>> {
    let values = parts
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .map_err(|err| CoreError::Parse(format!("invalid number '{part}': {err}")))
        })
        .collect::<Result<Vec<f64>>>()?;
    if values.is_empty() {
        return Err(CoreError::Parse("no coordinates".to_string()));
    }
    Ok(values)
}

fn parse_wkt(line: &str) -> Result<Geometry> {
    let upper = line.to_ascii_uppercase();
    if let Some(body) = upper.strip_prefix("POINT") {
        let inner = strip_parens(body, 1)?;
        return Ok(Geometry::Point(Point::new(parse_numbers(
            inner.split_whitespace(),
        )?)));
    }
    if let Some(body) = upper.strip_prefix("POLYGON") {
        let ring = strip_parens(body, 2)?;
        let mut min = (f64::INFINITY, f64::INFINITY);
        let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for vertex in ring.split(',') {
            match parse_numbers(vertex.split_whitespace())?.as_slice() {
                [x, y] => {
                    min = (min.0.min(*x), min.1.min(*y));
                    max = (max.0.max(*x), max.1.max(*y));
                }
                other => {
                    return Err(CoreError::Parse(format!(
                        "polygon vertex needs 2 values, got {}",
                        other.len()
                    )));
                }
            }
        }
        return Ok(Geometry::Rectangle(Rectangle::from_corners(
            min.0, min.1, max.0, max.1,
        )));
    }
    Err(CoreError::Parse(format!("unsupported wkt: '{line}'")))
}

fn strip_parens(body: &str, depth: usize) -> Result<&str> {
    let mut inner = body.trim();
    for _ in 0..depth {
        inner = inner
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| CoreError::Parse(format!("unbalanced parentheses in '{body}'")))?
            .trim();
    }
    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_renders_csv_and_wkt() {
        let point = Point::new(vec![0.25, 1.0]);
        assert_eq!(point.to_csv(), "0.25,1");
        assert_eq!(point.to_wkt(), "POINT (0.25 1)");
    }

    #[test]
    fn rectangle_renders_opposite_corners() {
        let rect = Rectangle::new(0.5, 0.25, 0.25, 0.5);
        assert_eq!(rect.to_csv(), "0.5,0.25,0.75,0.75");
        assert_eq!(
            rect.to_wkt(),
            "POLYGON ((0.5 0.25, 0.75 0.25, 0.75 0.75, 0.5 0.75, 0.5 0.25))"
        );
    }

    #[test]
    fn geometry_csv_matches_record_values() {
        let rect: Geometry = Rectangle::new(0.5, 0.25, 0.25, 0.5).into();
        assert_eq!(rect.csv_values(), vec![0.5, 0.25, 0.75, 0.75]);
        assert_eq!(rect.to_csv(), "0.5,0.25,0.75,0.75");

        let fields = ["0.5", " 0.25", "0.75", "0.75 "];
        let parsed = Geometry::from_csv_fields(fields, GeometryKind::Rectangle)
            .expect("parse fields");
        assert_eq!(parsed, rect);
    }

    #[test]
    fn csv_point_round_trip_is_exact() {
        let point = Point::new(vec![0.1, 0.7000000000000001, 1e-9]);
        let parsed = Geometry::parse(&point.to_csv(), GeometryKind::Point, OutputFormat::Csv)
            .expect("parse csv point");
        assert_eq!(parsed, Geometry::Point(point));
    }

    #[test]
    fn wkt_polygon_round_trip_recovers_corners() {
        let rect = Rectangle::new(0.125, 0.3, 0.2, 0.45);
        let parsed = Geometry::parse(&rect.to_wkt(), GeometryKind::Rectangle, OutputFormat::Wkt)
            .expect("parse wkt polygon");
        let Geometry::Rectangle(parsed) = parsed else {
            panic!("expected rectangle");
        };
        assert_eq!(parsed.x, rect.x);
        assert_eq!(parsed.y, rect.y);
        assert!((parsed.max_x() - rect.max_x()).abs() < 1e-12);
        assert!((parsed.max_y() - rect.max_y()).abs() < 1e-12);
    }

    #[test]
    fn wkt_point_is_parsed_regardless_of_requested_kind() {
        let parsed = Geometry::parse("POINT (3 4)", GeometryKind::Rectangle, OutputFormat::Wkt)
            .expect("parse wkt point");
        assert_eq!(parsed, Geometry::Point(Point::new(vec![3.0, 4.0])));
    }

    #[test]
    fn malformed_lines_are_rejected() {
        assert!(Geometry::parse("0.1,abc", GeometryKind::Point, OutputFormat::Csv).is_err());
        assert!(Geometry::parse("0.1,0.2", GeometryKind::Rectangle, OutputFormat::Csv).is_err());
        assert!(Geometry::parse("POINT 1 2", GeometryKind::Point, OutputFormat::Wkt).is_err());
        assert!(Geometry::parse("LINESTRING (0 0, 1 1)", GeometryKind::Point, OutputFormat::Wkt)
            .is_err());
    }

    #[test]
    fn unit_cube_check_rejects_nan_and_out_of_range() {
        assert!(Point::new(vec![0.0, 1.0]).is_in_unit_cube());
        assert!(!Point::new(vec![-0.0001, 0.5]).is_in_unit_cube());
        assert!(!Point::new(vec![0.5, 1.0001]).is_in_unit_cube());
        assert!(!Point::new(vec![f64::NAN, 0.5]).is_in_unit_cube());
    }

    #[test]
    fn midpoint_halves_each_coordinate() {
        let mid = Point::new(vec![0.0, 0.0]).midpoint(&Point::new(vec![1.0, 0.5]));
        assert_eq!(mid.coordinates, vec![0.5, 0.25]);
    }

    #[test]
    fn anchored_rectangle_needs_two_coordinates() {
        let rect = Rectangle::anchored_at(&Point::new(vec![0.2, 0.3, 0.9]), 0.1, 0.2)
            .expect("anchor rectangle");
        assert_eq!(rect, Rectangle::new(0.2, 0.3, 0.1, 0.2));
        assert!(Rectangle::anchored_at(&Point::new(vec![0.2]), 0.1, 0.1).is_err());
    }

    #[test]
    fn shared_edges_do_not_overlap() {
        let left = Rectangle::new(0.0, 0.0, 0.5, 1.0);
        let right = Rectangle::new(0.5, 0.0, 0.5, 1.0);
        assert!(!left.overlaps(&right, 1e-12));
        assert!(left.overlaps(&Rectangle::new(0.25, 0.25, 0.5, 0.5), 1e-12));
    }
}
