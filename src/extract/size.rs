use crate::extract::text::element_text;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Letter sizes, region-prefixed numeric sizes and bare numeric sizes
static SIZE_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:XXXS|XS|S|M|L|XL|XXL|XXXL|ONE SIZE|OS|O/S|(?:US|EU)\s?\d+(?:[.,]\d+)?|\d+(?:[.,]\d+)?)$",
    )
    .unwrap()
});

/// `<option>` elements are a strong structural signal and are not length-capped
const OPTION_SELECTOR: &str = "select option";

/// Clickable and label-like elements that often render size pickers
const CONTROL_SELECTOR: &str = "a, button, span, div, label";

/// Longest control text accepted as a size; keeps stray numbers out
const MAX_CONTROL_LEN: usize = 10;

/// Checks a candidate against the size grammar
///
/// The whole trimmed string must match; substrings never do.
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::is_size_token;
///
/// assert!(is_size_token("XL"));
/// assert!(is_size_token("EU 42"));
/// assert!(is_size_token("42,5"));
/// assert!(!is_size_token("XXXXL"));
/// assert!(!is_size_token("Size: M"));
/// ```
pub fn is_size_token(text: &str) -> bool {
    SIZE_GRAMMAR.is_match(text.trim())
}

/// Normalizes a size token: uppercase, double spaces collapsed
pub fn normalize_size(text: &str) -> String {
    text.trim().to_uppercase().replace("  ", " ")
}

/// Extracts the available sizes of a product
///
/// Option texts come first, then short control texts. The combined list is
/// deduplicated keeping the first occurrence of every normalized token.
pub fn extract_sizes(document: &Html) -> Vec<String> {
    let mut candidates = sizes_from_options(document);
    candidates.extend(sizes_from_controls(document));
    dedup_preserving_order(candidates)
}

/// Size tokens from `<select>` options
pub fn sizes_from_options(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(OPTION_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| is_size_token(text))
        .map(|text| normalize_size(&text))
        .collect()
}

/// Size tokens from buttons, links and labels of at most ten characters
pub fn sizes_from_controls(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(CONTROL_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .filter(|text| {
            !text.is_empty() && text.chars().count() <= MAX_CONTROL_LEN && is_size_token(text)
        })
        .map(|text| normalize_size(&text))
        .collect()
}

fn dedup_preserving_order(tokens: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| seen.insert(token.clone()))
        .collect()
}
