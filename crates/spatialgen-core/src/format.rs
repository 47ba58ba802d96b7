use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Text encoding used for dataset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated coordinates, one geometry per line.
    #[default]
    Csv,
    /// Well-known text (`POINT`/`POLYGON`), one geometry per line.
    Wkt,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Wkt => "wkt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "wkt" => Ok(OutputFormat::Wkt),
            other => Err(CoreError::Parse(format!(
                "unknown output format '{other}' (expected csv or wkt)"
            ))),
        }
    }
}

/// Shape of the emitted geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    #[default]
    Point,
    Rectangle,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(GeometryKind::Point),
            "rectangle" | "box" => Ok(GeometryKind::Rectangle),
            other => Err(CoreError::Parse(format!(
                "unknown geometry type '{other}' (expected point or rectangle)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!(" wkt ".parse::<OutputFormat>().unwrap(), OutputFormat::Wkt);
    }

    #[test]
    fn unknown_output_format_is_rejected() {
        let err = "geojson".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("geojson"));
    }

    #[test]
    fn geometry_kind_accepts_box_alias() {
        assert_eq!(
            "box".parse::<GeometryKind>().unwrap(),
            GeometryKind::Rectangle
        );
        assert!("polygon".parse::<GeometryKind>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&OutputFormat::Wkt).unwrap();
        assert_eq!(json, "\"wkt\"");
        let kind: GeometryKind = serde_json::from_str("\"rectangle\"").unwrap();
        assert_eq!(kind, GeometryKind::Rectangle);
    }
}
