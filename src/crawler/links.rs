//! Product link discovery on catalog pages

use crate::url::resolve_product_link;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// A catalog page that has been fetched and parsed
#[derive(Debug)]
pub struct ListingPage {
    /// 1-based page index
    pub index: u32,

    /// URL the page was fetched from
    pub url: String,

    /// Parsed document
    pub document: Html,
}

impl ListingPage {
    /// Parses a fetched catalog page body
    pub fn parse(index: u32, url: impl Into<String>, body: &str) -> Self {
        Self {
            index,
            url: url.into(),
            document: Html::parse_document(body),
        }
    }

    /// Product links found on this page
    pub fn product_links(&self, base_url: &Url, marker: &str) -> Vec<String> {
        collect_product_links(&self.document, base_url, marker)
    }
}

/// Collects product detail links from a catalog page
///
/// Anchors whose `href` contains `marker` are resolved against `base_url`.
/// Links that no longer carry the marker after resolution are dropped. The
/// result is deduplicated in document order.
///
/// # Arguments
///
/// * `document` - Parsed catalog page
/// * `base_url` - Base for resolving relative links (the catalog root)
/// * `marker` - Path fragment identifying product pages
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::collect_product_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/product/1">A</a><a href="/about">B</a>"#);
/// let base = Url::parse("https://shop.example.com/catalog").unwrap();
/// let links = collect_product_links(&html, &base, "/product/");
/// assert_eq!(links, vec!["https://shop.example.com/product/1"]);
/// ```
pub fn collect_product_links(document: &Html, base_url: &Url, marker: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !href.contains(marker) {
            continue;
        }

        if let Some(link) = resolve_product_link(href, base_url, marker) {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}
