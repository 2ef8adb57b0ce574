//! Color extraction
//!
//! Colors are found with three strategies tried in order. All of them share
//! the plausibility test, which rejects price badges, CTA labels and other UI
//! chrome that naive short-text scraping would otherwise return.

use crate::extract::text::{clean_text, fragments, page_body};
use scraper::{Html, Selector};

/// Labels that introduce a color value
const COLOR_LABELS: &[&str] = &["color", "colour", "цвет"];

/// Containers holding a product's property table
const PROPERTY_CONTAINERS: &str =
    ".properties, .product-properties, .characteristics, .product-params, .product__properties";

/// Substrings that disqualify a fragment from being a color (matched lowercase)
const NOISE_TERMS: &[&str] = &[
    // currency
    "₽", "руб", "$", "€", "£",
    // purchase actions
    "add to cart", "buy", "добавить", "корзин", "купить",
    // stock
    "in stock", "out of stock", "sold out", "в наличии", "предзаказ", "pre-order", "preorder",
    // promotions
    "sale", "discount", "скидк",
    // installment payments
    "в сплит", "долями", "рассрочк", "installment",
    // attribute labels
    "size", "размер", "color", "colour", "цвет",
];

const MIN_COLOR_LEN: usize = 2;
const MAX_COLOR_LEN: usize = 40;

type ColorStrategy = fn(&Html, &str) -> Option<String>;

/// Color strategies in the order they are tried
///
/// Each strategy receives the parsed page and the already extracted product
/// name.
pub const COLOR_STRATEGIES: [(&str, ColorStrategy); 3] = [
    ("label", color_from_label),
    ("properties", color_from_properties),
    ("first-plausible", color_from_any_fragment),
];

/// Extracts the product color
///
/// Returns an empty string if no strategy finds a plausible value.
pub fn extract_color(document: &Html, name: &str) -> String {
    COLOR_STRATEGIES
        .iter()
        .find_map(|(strategy_name, strategy)| {
            let color = strategy(document, name)?;
            tracing::trace!("Color resolved by {} strategy: {}", strategy_name, color);
            Some(color)
        })
        .unwrap_or_default()
}

/// Decides whether a text fragment is likely a color name
///
/// A fragment passes iff, after whitespace normalization, it is non-empty,
/// contains none of the noise terms, is 2 to 40 characters long and has at
/// least one Latin or Cyrillic letter.
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::is_plausible_color;
///
/// assert!(is_plausible_color("Черный"));
/// assert!(!is_plausible_color("1990 ₽"));
/// assert!(!is_plausible_color("В наличии"));
/// ```
pub fn is_plausible_color(text: &str) -> bool {
    let text = clean_text(text);
    if text.is_empty() {
        return false;
    }

    let lower = text.to_lowercase();
    if NOISE_TERMS.iter().any(|term| lower.contains(term)) {
        return false;
    }

    let len = text.chars().count();
    (MIN_COLOR_LEN..=MAX_COLOR_LEN).contains(&len) && text.chars().any(is_latin_or_cyrillic)
}

fn is_latin_or_cyrillic(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'А'..='я' | 'Ё' | 'ё')
}

/// Returns true if a fragment is a bare color label, with or without a colon
fn is_color_label(fragment: &str) -> bool {
    let label = fragment.trim_end_matches(':').trim().to_lowercase();
    COLOR_LABELS.contains(&label.as_str())
}

/// Strategy 1: a fragment of the form "Color: value"
pub fn color_from_label(document: &Html, _name: &str) -> Option<String> {
    fragments(page_body(document)).into_iter().find_map(|fragment| {
        let (label, value) = fragment.split_once(':')?;
        if !COLOR_LABELS.contains(&label.trim().to_lowercase().as_str()) {
            return None;
        }
        let value = clean_text(value);
        is_plausible_color(&value).then_some(value)
    })
}

/// Strategy 2: the fragment following a "Color" label inside a property table
pub fn color_from_properties(document: &Html, _name: &str) -> Option<String> {
    let selector = Selector::parse(PROPERTY_CONTAINERS).ok()?;

    document.select(&selector).find_map(|container| {
        let texts = fragments(container);
        texts.windows(2).find_map(|pair| {
            (is_color_label(&pair[0]) && is_plausible_color(&pair[1])).then(|| pair[1].clone())
        })
    })
}

/// Strategy 3: the first plausible fragment of the page that isn't the name
pub fn color_from_any_fragment(document: &Html, name: &str) -> Option<String> {
    fragments(page_body(document))
        .into_iter()
        .find(|fragment| fragment != name && is_plausible_color(fragment))
}
