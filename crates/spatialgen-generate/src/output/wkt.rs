use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use spatialgen_core::Geometry;

use super::CountingWriter;
use crate::errors::GenerationError;

/// Line-oriented WKT dataset.
///
/// WKT text contains commas, so it is written raw rather than through the
/// CSV encoder, which would quote every polygon.
pub struct WktDatasetWriter {
    writer: CountingWriter<BufWriter<File>>,
    rows: u64,
}

impl WktDatasetWriter {
    pub fn create(path: &Path) -> Result<Self, GenerationError> {
        let file = BufWriter::new(File::create(path)?);
        Ok(Self {
            writer: CountingWriter::new(file),
            rows: 0,
        })
    }

    pub fn write(&mut self, geometry: &Geometry) -> Result<(), GenerationError> {
        writeln!(self.writer, "{}", geometry.to_wkt())?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn finish(mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        Ok(self.writer.bytes_written())
    }
}
