use crate::extract::text::element_text;
use scraper::{Html, Selector};

/// Extracts the product name from the first `<h1>` of the page
///
/// Returns an empty string if the page has no top-level heading.
pub fn extract_name(document: &Html) -> String {
    let Ok(selector) = Selector::parse("h1") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}
