use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use spatialgen_core::Geometry;

use super::CountingWriter;
use crate::errors::GenerationError;

/// CSV dataset: point coordinates, or `x1,y1,x2,y2` for rectangles.
pub struct CsvDatasetWriter {
    writer: csv::Writer<CountingWriter<BufWriter<File>>>,
    rows: u64,
}

impl CsvDatasetWriter {
    pub fn create(path: &Path) -> Result<Self, GenerationError> {
        let file = BufWriter::new(File::create(path)?);
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(CountingWriter::new(file));
        Ok(Self { writer, rows: 0 })
    }

    pub fn write(&mut self, geometry: &Geometry) -> Result<(), GenerationError> {
        let record: Vec<String> = geometry
            .csv_values()
            .iter()
            .map(|value| value.to_string())
            .collect();
        self.writer.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn finish(mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        let counting = self
            .writer
            .into_inner()
            .map_err(|err| GenerationError::Io(err.into_error()))?;
        Ok(counting.bytes_written())
    }
}
