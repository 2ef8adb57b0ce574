//! Run statistics
//!
//! This module accumulates per-catalog reports into a summary for the whole
//! run and prints it at the end.

use crate::crawler::{CatalogReport, WalkEnd};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Number of catalogs walked
    pub catalogs_crawled: u64,

    /// Catalog pages fetched successfully
    pub pages_fetched: u64,

    /// Products extracted successfully
    pub products_assembled: u64,

    /// Products skipped after a failure
    pub products_failed: u64,

    /// Links skipped as already seen within their walk
    pub duplicate_links: u64,

    /// Rows handed to the sinks
    pub rows_written: u64,

    /// Count of catalogs by how their walk ended
    pub walk_ends: HashMap<WalkEnd, u64>,
}

impl CrawlStatistics {
    /// Creates empty statistics starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            catalogs_crawled: 0,
            pages_fetched: 0,
            products_assembled: 0,
            products_failed: 0,
            duplicate_links: 0,
            rows_written: 0,
            walk_ends: HashMap::new(),
        }
    }

    /// Adds one catalog's report to the totals
    pub fn record_catalog(&mut self, report: &CatalogReport) {
        self.catalogs_crawled += 1;
        self.pages_fetched += u64::from(report.pages_fetched);
        self.products_assembled += u64::from(report.products_assembled);
        self.products_failed += u64::from(report.products_failed);
        self.duplicate_links += u64::from(report.duplicate_links);
        self.rows_written += report.rows.len() as u64;
        *self.walk_ends.entry(report.end).or_insert(0) += 1;
    }

    /// Marks the run as finished now
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of catalogs that ended with the given reason
    pub fn catalogs_ended(&self, end: WalkEnd) -> u64 {
        self.walk_ends.get(&end).copied().unwrap_or(0)
    }

    /// Run duration in seconds, if finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Returns the product success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.products_assembled + self.products_failed;
        if attempted == 0 {
            return 0.0;
        }
        (self.products_assembled as f64 / attempted as f64) * 100.0
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {}s", duration);
    }
    println!();

    println!("Overview:");
    println!("  Catalogs crawled: {}", stats.catalogs_crawled);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!(
        "  Products assembled: {} ({:.1}% of attempts)",
        stats.products_assembled,
        stats.success_rate()
    );
    println!("  Products failed: {}", stats.products_failed);
    println!("  Duplicate links skipped: {}", stats.duplicate_links);
    println!("  Rows written: {}", stats.rows_written);
    println!();

    println!("Catalogs by End Reason:");
    for end in WalkEnd::ALL {
        println!("  {}: {}", end, stats.catalogs_ended(end));
    }
}
