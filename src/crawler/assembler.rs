//! Product page assembly
//!
//! Fetches a product page and runs the field extractors over it. Parsing and
//! extraction run behind a panic boundary so that one malformed page can only
//! cost its own product.

use crate::crawler::fetcher::Fetcher;
use crate::extract::extract_record;
use crate::product::ProductRecord;
use crate::HarvestError;
use scraper::Html;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Signature of a whole-page extractor
pub type RecordExtractor = fn(&Html, &str) -> ProductRecord;

/// Builds [`ProductRecord`]s from product links
#[derive(Clone)]
pub struct ProductAssembler {
    fetcher: Fetcher,
    extractor: RecordExtractor,
}

impl ProductAssembler {
    /// Creates an assembler using the standard extractors
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            extractor: extract_record,
        }
    }

    /// Replaces the extractor run over each fetched page
    pub fn with_extractor(mut self, extractor: RecordExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetches and extracts a single product
    ///
    /// # Arguments
    ///
    /// * `link` - Absolute product URL
    ///
    /// # Returns
    ///
    /// * `Ok(ProductRecord)` - Extracted record; missing fields are empty
    /// * `Err(HarvestError::Transport)` - The page could not be fetched
    /// * `Err(HarvestError::Assembly)` - Parsing or extraction panicked
    pub async fn assemble(&self, link: &str) -> Result<ProductRecord, HarvestError> {
        let body = self.fetcher.fetch(link).await?;
        self.assemble_from_html(link, &body)
    }

    /// Extracts a product from an already fetched body
    pub fn assemble_from_html(&self, link: &str, body: &str) -> Result<ProductRecord, HarvestError> {
        let extractor = self.extractor;

        panic::catch_unwind(AssertUnwindSafe(|| {
            let document = Html::parse_document(body);
            extractor(&document, link)
        }))
        .map_err(|payload| HarvestError::Assembly {
            url: link.to_string(),
            message: panic_message(payload.as_ref()),
        })
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "extraction panicked".to_string()
    }
}
