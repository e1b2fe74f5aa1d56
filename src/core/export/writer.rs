//! Streaming CSV sink
//!
//! Writes report rows incrementally: the header once on creation, then
//! batch-wise appends through a buffered encoder. Batches are dropped
//! after each write and the sink is flushed at a configurable record
//! interval, keeping working memory flat however large the export gets.
//! The file handle is released when the exporter is finished or dropped,
//! on error paths included.

use crate::domain::{CofferError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Streaming CSV writer for one report file
pub struct CsvExporter {
    writer: csv::Writer<File>,
    path: PathBuf,
    columns: usize,
    records_written: u64,
    records_since_flush: u64,
    flush_interval: u64,
}

impl CsvExporter {
    /// Create the output file and write the header row
    ///
    /// An existing file at the path is truncated; every run produces a
    /// fresh report.
    pub fn create(path: impl AsRef<Path>, headers: &[&str], flush_interval: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| {
            CofferError::Export(format!("failed to create {}: {e}", path.display()))
        })?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(headers)?;

        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            "Opened CSV export"
        );

        Ok(Self {
            writer,
            path,
            columns: headers.len(),
            records_written: 0,
            records_since_flush: 0,
            flush_interval: flush_interval.max(1),
        })
    }

    /// Append one batch of rows
    ///
    /// The batch is consumed and dropped on return. Crossing the flush
    /// interval triggers an explicit sink flush, the pressure-release
    /// checkpoint for very large exports.
    ///
    /// # Errors
    ///
    /// A row whose width disagrees with the header is an export error;
    /// the schema functions guarantee this never happens for projected
    /// records.
    pub fn write_batch(&mut self, rows: Vec<Vec<String>>) -> Result<()> {
        for row in &rows {
            if row.len() != self.columns {
                return Err(CofferError::Export(format!(
                    "row width {} does not match schema width {} in {}",
                    row.len(),
                    self.columns,
                    self.path.display()
                )));
            }
            self.writer.write_record(row)?;
        }

        let count = rows.len() as u64;
        self.records_written += count;
        self.records_since_flush += count;

        if self.records_since_flush >= self.flush_interval {
            self.writer
                .flush()
                .map_err(|e| CofferError::Export(e.to_string()))?;
            tracing::info!(
                path = %self.path.display(),
                records_written = self.records_written,
                "Flush checkpoint"
            );
            self.records_since_flush = 0;
        }

        Ok(())
    }

    /// Total records written so far (header excluded)
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush and close the file, returning the record count
    pub fn finish(mut self) -> Result<u64> {
        self.writer
            .flush()
            .map_err(|e| CofferError::Export(e.to_string()))?;
        tracing::debug!(
            path = %self.path.display(),
            records = self.records_written,
            "Closed CSV export"
        );
        Ok(self.records_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
        values
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let exporter = CsvExporter::create(&path, &["a", "b"], 100).unwrap();
        exporter.finish().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "a,b\n");
    }

    #[test]
    fn test_batches_append_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut exporter = CsvExporter::create(&path, &["id", "name"], 100).unwrap();
        exporter.write_batch(rows(&[&["1", "one"], &["2", "two"]])).unwrap();
        exporter.write_batch(rows(&[&["3", "three"]])).unwrap();
        let written = exporter.finish().unwrap();

        assert_eq!(written, 3);
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "id,name\n1,one\n2,two\n3,three\n");
    }

    #[test]
    fn test_fields_with_delimiters_are_quoted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut exporter = CsvExporter::create(&path, &["id", "notes"], 100).unwrap();
        exporter
            .write_batch(rows(&[&["1", "hello, \"world\""]]))
            .unwrap();
        exporter.finish().unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "hello, \"world\"");
    }

    #[test]
    fn test_row_width_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut exporter = CsvExporter::create(&path, &["a", "b"], 100).unwrap();
        let err = exporter.write_batch(rows(&[&["only-one"]])).unwrap_err();
        assert!(err.to_string().contains("row width"));
    }

    #[test]
    fn test_flush_checkpoint_interval() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut exporter = CsvExporter::create(&path, &["n"], 2).unwrap();
        exporter.write_batch(rows(&[&["1"], &["2"]])).unwrap();

        // Two records crossed the interval, so the data is on disk
        // before finish() is called.
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("2\n"));
        exporter.finish().unwrap();
    }

    #[test]
    fn test_existing_file_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale content\n").unwrap();

        let exporter = CsvExporter::create(&path, &["fresh"], 100).unwrap();
        exporter.finish().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "fresh\n");
    }
}
