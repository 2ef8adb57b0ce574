//! Catalog walker - pagination loop for a single catalog root
//!
//! A walk moves through these states:
//!
//! ```text
//! Start -> FetchingPage(1) -> FetchingPage(2) -> ... -> Done
//!                 |                                    ^
//!                 +--> PageExhausted ------------------+
//! ```
//!
//! Every product link is assembled at most once per walk, even when it
//! appears on several pages. Failures never escape a walk: they end it
//! (page fetch) or skip one product (assembly), and are visible in the
//! returned [`CatalogReport`].

use crate::config::Config;
use crate::crawler::assembler::ProductAssembler;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::links::ListingPage;
use crate::crawler::throttle::{FixedDelay, Throttle};
use crate::product::{flatten, OutputRow};
use crate::url::catalog_page_url;
use crate::HarvestError;
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Why a catalog walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkEnd {
    /// A page returned no product links
    Exhausted,

    /// A catalog page could not be fetched
    FetchFailed,

    /// The per-catalog page bound was reached
    PageLimit,
}

impl WalkEnd {
    /// All end reasons, in reporting order
    pub const ALL: [WalkEnd; 3] = [WalkEnd::Exhausted, WalkEnd::FetchFailed, WalkEnd::PageLimit];

    /// Returns the snake_case name of this reason
    pub fn as_str(&self) -> &'static str {
        match self {
            WalkEnd::Exhausted => "exhausted",
            WalkEnd::FetchFailed => "fetch_failed",
            WalkEnd::PageLimit => "page_limit",
        }
    }
}

impl fmt::Display for WalkEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Internal state of a walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    Start,
    FetchingPage(u32),
    PageExhausted,
    Done(WalkEnd),
}

/// Outcome of walking one catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReport {
    /// The catalog root as listed
    pub root: String,

    /// Flattened rows in discovery order
    pub rows: Vec<OutputRow>,

    /// Catalog pages fetched successfully
    pub pages_fetched: u32,

    /// Products extracted successfully
    pub products_assembled: u32,

    /// Products skipped because fetching or extraction failed
    pub products_failed: u32,

    /// Links skipped because they were already seen in this walk
    pub duplicate_links: u32,

    /// Why the walk stopped
    pub end: WalkEnd,
}

impl CatalogReport {
    fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            rows: Vec::new(),
            pages_fetched: 0,
            products_assembled: 0,
            products_failed: 0,
            duplicate_links: 0,
            end: WalkEnd::Exhausted,
        }
    }
}

/// Walks paginated catalogs and assembles every product found
pub struct CatalogWalker {
    fetcher: Fetcher,
    assembler: ProductAssembler,
    throttle: Box<dyn Throttle>,
    max_pages: u32,
    marker: String,
}

impl CatalogWalker {
    /// Creates a new walker
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Fetcher used for catalog pages
    /// * `assembler` - Assembler used for product pages
    /// * `throttle` - Pacing between requests
    /// * `max_pages` - Per-catalog page bound
    /// * `marker` - Path fragment identifying product links
    pub fn new(
        fetcher: Fetcher,
        assembler: ProductAssembler,
        throttle: Box<dyn Throttle>,
        max_pages: u32,
        marker: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            assembler,
            throttle,
            max_pages,
            marker: marker.into(),
        }
    }

    /// Builds a walker with an HTTP client and fixed delays from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        let fetcher = Fetcher::new(client);
        let throttle = FixedDelay::from_millis(
            config.crawler.product_delay_ms,
            config.crawler.page_delay_ms,
        );

        Ok(Self::new(
            fetcher.clone(),
            ProductAssembler::new(fetcher),
            Box::new(throttle),
            config.crawler.max_pages_per_catalog,
            config.crawler.product_path_marker.clone(),
        ))
    }

    /// Walks one catalog from page 1 until it ends
    ///
    /// # Arguments
    ///
    /// * `root` - Catalog root URL; also the base for relative product links
    ///
    /// # Returns
    ///
    /// A report holding the rows and how the walk ended. A root that is not a
    /// valid URL ends immediately with `WalkEnd::FetchFailed`.
    pub async fn walk(&self, root: &str) -> CatalogReport {
        let mut report = CatalogReport::new(root);

        let base_url = match Url::parse(root) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping catalog with invalid root {}: {}", root, e);
                report.end = WalkEnd::FetchFailed;
                return report;
            }
        };

        let mut seen = HashSet::new();
        let mut state = WalkState::Start;

        loop {
            state = match state {
                WalkState::Start => WalkState::FetchingPage(1),
                WalkState::FetchingPage(index) if index > self.max_pages => {
                    tracing::info!(
                        "Reached page bound of {} for {}",
                        self.max_pages,
                        root
                    );
                    WalkState::Done(WalkEnd::PageLimit)
                }
                WalkState::FetchingPage(index) => {
                    self.visit_page(index, &base_url, &mut seen, &mut report)
                        .await
                }
                WalkState::PageExhausted => WalkState::Done(WalkEnd::Exhausted),
                WalkState::Done(end) => {
                    report.end = end;
                    break;
                }
            };
        }

        tracing::info!(
            "Finished {} ({}): {} pages, {} products, {} rows",
            root,
            report.end,
            report.pages_fetched,
            report.products_assembled,
            report.rows.len()
        );

        report
    }

    /// Fetches one catalog page and assembles its new product links
    async fn visit_page(
        &self,
        index: u32,
        base_url: &Url,
        seen: &mut HashSet<String>,
        report: &mut CatalogReport,
    ) -> WalkState {
        let page_url = catalog_page_url(&report.root, index);
        tracing::debug!("Fetching catalog page {}: {}", index, page_url);

        let body = match self.fetcher.fetch(&page_url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Catalog page {} failed, ending walk: {}", index, e);
                self.throttle.after_page().await;
                return WalkState::Done(WalkEnd::FetchFailed);
            }
        };
        report.pages_fetched += 1;

        // The parsed document is not Send; drop it before the next await
        let links = ListingPage::parse(index, page_url, &body).product_links(base_url, &self.marker);

        if links.is_empty() {
            tracing::info!("No products on page {} of {}", index, report.root);
            self.throttle.after_page().await;
            return WalkState::PageExhausted;
        }

        tracing::debug!("Page {} lists {} products", index, links.len());

        for link in links {
            if !seen.insert(link.clone()) {
                tracing::debug!("Skipping already assembled product {}", link);
                report.duplicate_links += 1;
                continue;
            }

            match self.assembler.assemble(&link).await {
                Ok(record) => {
                    report.products_assembled += 1;
                    report.rows.extend(flatten(&record));
                }
                Err(e) => {
                    tracing::warn!("Skipping product {}: {}", link, e);
                    report.products_failed += 1;
                }
            }

            self.throttle.after_product().await;
        }

        self.throttle.after_page().await;
        WalkState::FetchingPage(index + 1)
    }
}
