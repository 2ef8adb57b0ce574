//! Output module for harvested rows and run summaries
//!
//! This module handles:
//! - Writing rows to the CSV file
//! - Appending rows to a Google spreadsheet
//! - Recording and printing run statistics

pub mod auth;
mod csv_output;
mod sheets;
pub mod stats;
mod traits;

pub use auth::{ServiceAccountTokens, StaticToken, TokenSource};
pub use csv_output::CsvSink;
pub use sheets::SheetsSink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RowSink};
