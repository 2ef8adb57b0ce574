use crate::extract::text::element_text;
use scraper::{Html, Selector};

/// Conventional breadcrumb link selectors
const BREADCRUMB_SELECTOR: &str =
    "nav.breadcrumbs a, .breadcrumbs a, [aria-label='breadcrumb'] a, .breadcrumb a";

/// Maximum number of trailing breadcrumb segments kept
const MAX_SEGMENTS: usize = 4;

/// Extracts the category path from the breadcrumb trail
///
/// Breadcrumb trails vary in depth across sites. The last segments are the
/// most specific ones, so at most the last four non-empty entries are joined
/// with " / ". Fewer than two entries is not a trail and yields an empty
/// string.
pub fn extract_category(document: &Html) -> String {
    let Ok(selector) = Selector::parse(BREADCRUMB_SELECTOR) else {
        return String::new();
    };

    let crumbs: Vec<String> = document
        .select(&selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    if crumbs.len() < 2 {
        return String::new();
    }

    let start = crumbs.len().saturating_sub(MAX_SEGMENTS);
    crumbs[start..].join(" / ")
}
