//! Heuristic field extractors for product pages
//!
//! Every extractor is a pure function over a parsed page. Absent data is
//! never an error: it comes back as an empty string, an empty list or
//! `StockStatus::Unknown`.
//!
//! Fields with several strategies (color, stock) expose them as ordered
//! tables, so each strategy can be tested on its own and the fallback order
//! is part of the public contract.
//!
//! Text-based strategies read `<body>` only; the `<title>` never feeds the
//! stock vote or the color fallbacks.

mod category;
mod color;
mod name;
mod size;
mod stock;
mod text;

pub use category::extract_category;
pub use color::{
    color_from_any_fragment, color_from_label, color_from_properties, extract_color,
    is_plausible_color, COLOR_STRATEGIES,
};
pub use name::extract_name;
pub use size::{extract_sizes, is_size_token, normalize_size, sizes_from_controls, sizes_from_options};
pub use stock::{extract_stock, stock_from_cta_button, stock_from_page_text, STOCK_STRATEGIES};
pub use text::{clean_text, element_text, fragments, page_body, visible_text};

use crate::product::ProductRecord;
use scraper::Html;

/// Runs every field extractor over a product page
///
/// The name is extracted first because the color fallback must not return
/// the product name itself.
///
/// # Arguments
///
/// * `document` - The parsed product page
/// * `url` - The product link the page was fetched from
///
/// # Example
///
/// ```
/// use catalog_harvest::extract::extract_record;
/// use catalog_harvest::StockStatus;
/// use scraper::Html;
///
/// let html = Html::parse_document(
///     "<html><body><h1>Boot</h1><p>Color: Olive</p><p>In stock</p></body></html>",
/// );
/// let record = extract_record(&html, "https://x.com/product/boot");
/// assert_eq!(record.name, "Boot");
/// assert_eq!(record.color, "Olive");
/// assert_eq!(record.stock, StockStatus::InStock);
/// ```
pub fn extract_record(document: &Html, url: &str) -> ProductRecord {
    let name = extract_name(document);
    let category = extract_category(document);
    let stock = extract_stock(document);
    let color = extract_color(document, &name);
    let sizes = extract_sizes(document);

    ProductRecord {
        url: url.to_string(),
        name,
        category,
        color,
        sizes,
        stock,
    }
}
