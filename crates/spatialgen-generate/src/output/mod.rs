//! Dataset writers: one geometry per line, no header.

pub mod csv;
pub mod wkt;

use std::io::Write;
use std::path::{Path, PathBuf};

use spatialgen_core::{Geometry, OutputFormat};

use crate::errors::GenerationError;

pub use self::csv::CsvDatasetWriter;
pub use self::wkt::WktDatasetWriter;

/// Streaming writer for the configured output format.
pub enum DatasetWriter {
    Csv(CsvDatasetWriter),
    Wkt(WktDatasetWriter),
}

impl DatasetWriter {
    pub fn create(path: &Path, format: OutputFormat) -> Result<Self, GenerationError> {
        Ok(match format {
            OutputFormat::Csv => DatasetWriter::Csv(CsvDatasetWriter::create(path)?),
            OutputFormat::Wkt => DatasetWriter::Wkt(WktDatasetWriter::create(path)?),
        })
    }

    pub fn write(&mut self, geometry: &Geometry) -> Result<(), GenerationError> {
        match self {
            DatasetWriter::Csv(writer) => writer.write(geometry),
            DatasetWriter::Wkt(writer) => writer.write(geometry),
        }
    }

    /// Number of geometries written so far.
    pub fn rows(&self) -> u64 {
        match self {
            DatasetWriter::Csv(writer) => writer.rows(),
            DatasetWriter::Wkt(writer) => writer.rows(),
        }
    }

    /// Flushes the file and returns the number of bytes written.
    pub fn finish(self) -> Result<u64, GenerationError> {
        match self {
            DatasetWriter::Csv(writer) => writer.finish(),
            DatasetWriter::Wkt(writer) => writer.finish(),
        }
    }
}

/// Sibling path a file is written to before being renamed into place.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use spatialgen_core::{Point, Rectangle};

    use super::*;

    fn temp_file(name: &str) -> std::path::PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("spatialgen_output_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir.join(name)
    }

    fn sample() -> Vec<Geometry> {
        vec![
            Point::new(vec![0.25, 1.0]).into(),
            Rectangle::new(0.5, 0.0, 0.25, 0.5).into(),
        ]
    }

    fn write_all(path: &Path, format: OutputFormat) -> u64 {
        let mut writer = DatasetWriter::create(path, format).expect("create writer");
        for geometry in sample() {
            writer.write(&geometry).expect("write");
        }
        assert_eq!(writer.rows(), 2);
        writer.finish().expect("finish")
    }

    #[test]
    fn staging_file_sits_next_to_the_target() {
        assert_eq!(
            staging_path(Path::new("out/data.csv")),
            PathBuf::from("out/data.csv.tmp")
        );
    }

    #[test]
    fn csv_has_no_header_and_counts_bytes() {
        let path = temp_file("mixed.csv");
        let bytes = write_all(&path, OutputFormat::Csv);
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(text, "0.25,1\n0.5,0,0.75,0.5\n");
        assert_eq!(bytes, text.len() as u64);
    }

    #[test]
    fn wkt_lines_are_not_quoted() {
        let path = temp_file("mixed.wkt");
        let bytes = write_all(&path, OutputFormat::Wkt);
        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(
            text,
            "POINT (0.25 1)\nPOLYGON ((0.5 0, 0.75 0, 0.75 0.5, 0.5 0.5, 0.5 0))\n"
        );
        assert_eq!(bytes, text.len() as u64);
    }
}
