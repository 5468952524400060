use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use rvis_core::error::CrawlError;
use rvis_core::models::{CSV_HEADER, LocationRecord};
use rvis_core::traits::RecordSink;

/// Append-only CSV output for location records.
///
/// The header row is written on creation; each [`RecordSink::append`] writes
/// one batch and flushes it, so pages persisted before a failure survive.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    written: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) `path` and write the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, CrawlError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            CrawlError::Sink(format!("Failed to create {}: {e}", path.display()))
        })?;
        tracing::debug!(path = %path.display(), "Initialized output file");
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap any writer; the header is written immediately.
    pub fn from_writer(writer: W) -> Result<Self, CrawlError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(CSV_HEADER).map_err(sink_error)?;
        writer.flush().map_err(|e| CrawlError::Sink(e.to_string()))?;
        Ok(Self { writer, written: 0 })
    }

    /// Records appended so far, excluding the header.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, CrawlError> {
        self.writer
            .into_inner()
            .map_err(|e| CrawlError::Sink(e.to_string()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, records: &[LocationRecord]) -> Result<(), CrawlError> {
        for record in records {
            self.writer.serialize(record).map_err(sink_error)?;
        }
        self.writer
            .flush()
            .map_err(|e| CrawlError::Sink(e.to_string()))?;
        self.written += records.len();
        Ok(())
    }
}

/// Read an output file back into records.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LocationRecord>, CrawlError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| CrawlError::Sink(format!("Failed to open {}: {e}", path.display())))?;
    read_records_from(file)
}

pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<LocationRecord>, CrawlError> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader)
        .deserialize()
        .map(|row| row.map_err(sink_error))
        .collect()
}

fn sink_error(e: csv::Error) -> CrawlError {
    CrawlError::Sink(e.to_string())
}
