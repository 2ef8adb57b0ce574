//! URL handling module for Catalog-Harvest
//!
//! This module provides catalog pagination and product link resolution.

mod pagination;
mod resolve;

// Re-export main functions
pub use pagination::catalog_page_url;
pub use resolve::{resolve_product_link, DEFAULT_PRODUCT_MARKER};

use crate::ConfigError;
use url::Url;

/// Checks that a catalog root is an absolute HTTP(S) URL
///
/// Catalog roots are otherwise opaque: they are never normalized, so the
/// first page is always requested exactly as written.
///
/// # Arguments
///
/// * `root` - The catalog root URL as supplied by the catalog list
///
/// # Returns
///
/// * `Ok(Url)` - The parsed root
/// * `Err(ConfigError)` - The root is malformed or not HTTP(S)
pub fn parse_catalog_root(root: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid catalog URL '{}': {}", root, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Catalog URL '{}' must use HTTP or HTTPS, got: {}",
            root,
            url.scheme()
        )));
    }

    Ok(url)
}
