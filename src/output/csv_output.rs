//! CSV file sink
//!
//! The CSV file is written on every run and is the fallback copy of the
//! harvested rows.

use crate::output::traits::{OutputError, OutputResult, RowSink};
use crate::product::{OutputRow, OUTPUT_HEADER};
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Writes rows to a comma-delimited UTF-8 file
pub struct CsvSink {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    rows_written: u64,
}

impl CsvSink {
    /// Creates a sink for `path`; the file is created on `start`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
            rows_written: 0,
        }
    }

    /// Number of data rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

#[async_trait]
impl RowSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn start(&mut self) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(OUTPUT_HEADER)?;
        self.writer = Some(writer);

        tracing::debug!("Writing rows to {}", self.path.display());
        Ok(())
    }

    async fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        let writer = self.writer.as_mut().ok_or(OutputError::NotStarted("csv"))?;

        for row in rows {
            writer.write_record(row.to_record())?;
        }
        self.rows_written += rows.len() as u64;

        Ok(())
    }

    async fn finish(&mut self) -> OutputResult<()> {
        let writer = self.writer.as_mut().ok_or(OutputError::NotStarted("csv"))?;
        writer.flush()?;

        tracing::info!(
            "Wrote {} rows to {}",
            self.rows_written,
            self.path.display()
        );
        Ok(())
    }
}
