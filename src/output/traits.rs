//! Output sink traits and errors
//!
//! Every destination for harvested rows implements [`RowSink`]. The
//! orchestrator drives all sinks through the same lifecycle:
//! `start` once, `write_rows` once per catalog, `finish` once.

use crate::product::OutputRow;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    Sheets(String),

    #[error("Spreadsheet credentials error: {0}")]
    Credentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("Sink {0} used before start")]
    NotStarted(&'static str),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// A destination for output rows
#[async_trait]
pub trait RowSink: Send {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Prepares the destination and writes the header row
    async fn start(&mut self) -> OutputResult<()>;

    /// Appends rows in the order given
    ///
    /// # Arguments
    ///
    /// * `rows` - Rows of one catalog, in discovery order
    async fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()>;

    /// Flushes anything still buffered
    async fn finish(&mut self) -> OutputResult<()>;
}
