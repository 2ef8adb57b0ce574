//! Crawler module for catalog walking and product assembly
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - Product link discovery on catalog pages
//! - Product page assembly behind a panic boundary
//! - Politeness pacing
//! - The per-catalog pagination loop and the run orchestrator

mod assembler;
mod fetcher;
mod links;
mod throttle;
mod walker;

pub use assembler::{ProductAssembler, RecordExtractor};
pub use fetcher::{build_http_client, Fetcher};
pub use links::{collect_product_links, ListingPage};
pub use throttle::{FixedDelay, Throttle};
pub use walker::{CatalogReport, CatalogWalker, WalkEnd};

use crate::config::Config;
use crate::output::{CrawlStatistics, RowSink};
use crate::HarvestError;

/// Runs a complete harvest over a list of catalogs
///
/// Catalogs are walked one after another. After each walk its rows are
/// handed to every sink, so sinks see rows in catalog order and, within a
/// catalog, in discovery order. Every sink is finished even when the
/// harvest stops early, so rows already written are flushed.
///
/// # Arguments
///
/// * `config` - The harvest configuration
/// * `catalogs` - Catalog roots in the order they should be walked
/// * `sinks` - Output destinations; each is started before the first walk
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Harvest completed
/// * `Err(HarvestError)` - Client setup or a sink failed; the first
///   failure is returned
pub async fn run_crawl(
    config: &Config,
    catalogs: &[String],
    sinks: &mut [Box<dyn RowSink>],
) -> Result<CrawlStatistics, HarvestError> {
    let walker = CatalogWalker::from_config(config)?;
    let mut stats = CrawlStatistics::new();

    let harvested = harvest_catalogs(&walker, catalogs, sinks, &mut stats).await;
    let finished = finish_sinks(sinks).await;
    harvested?;
    finished?;

    stats.finish();

    tracing::info!(
        "Harvest complete: {} catalogs, {} products, {} rows",
        stats.catalogs_crawled,
        stats.products_assembled,
        stats.rows_written
    );

    Ok(stats)
}

async fn harvest_catalogs(
    walker: &CatalogWalker,
    catalogs: &[String],
    sinks: &mut [Box<dyn RowSink>],
    stats: &mut CrawlStatistics,
) -> Result<(), HarvestError> {
    for sink in sinks.iter_mut() {
        sink.start().await?;
        tracing::debug!("Started {} sink", sink.name());
    }

    for (position, root) in catalogs.iter().enumerate() {
        tracing::info!("Catalog {}/{}: {}", position + 1, catalogs.len(), root);

        let report = walker.walk(root).await;

        for sink in sinks.iter_mut() {
            sink.write_rows(&report.rows).await?;
        }

        stats.record_catalog(&report);
    }

    Ok(())
}

/// Finishes every sink, returning the first failure
async fn finish_sinks(sinks: &mut [Box<dyn RowSink>]) -> Result<(), HarvestError> {
    let mut first_error = None;

    for sink in sinks.iter_mut() {
        if let Err(e) = sink.finish().await {
            tracing::error!("Failed to finish {} sink: {}", sink.name(), e);
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
