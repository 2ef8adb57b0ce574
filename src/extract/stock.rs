use crate::extract::text::{element_text, visible_text};
use crate::product::StockStatus;
use scraper::{Html, Selector};

/// Phrases that mark a product as unavailable (English and Russian)
///
/// Checked before the in-stock phrases: "нет в наличии" contains "в наличии".
const OUT_OF_STOCK_PHRASES: &[&str] = &["out of stock", "sold out", "нет в наличии"];

/// Phrases that mark a product as available
const IN_STOCK_PHRASES: &[&str] = &["in stock", "в наличии"];

/// Call-to-action labels that only appear on purchasable products
const BUY_PHRASES: &[&str] = &["add to cart", "add to bag", "buy", "в корзину", "купить"];

/// Primary call-to-action buttons on a product page
const CTA_SELECTOR: &str = "button[name='add'], .add-to-cart, .product__add-to-cart, \
     .js-add-to-cart, .btn-buy, [data-action='add-to-cart'], form[action*='cart'] button[type='submit']";

type StockStrategy = fn(&Html) -> Option<StockStatus>;

/// Stock strategies in the order they are tried
pub const STOCK_STRATEGIES: [(&str, StockStrategy); 2] = [
    ("cta-button", stock_from_cta_button),
    ("page-text", stock_from_page_text),
];

/// Derives the stock status of a product page
///
/// Tries each of `STOCK_STRATEGIES` in order; the first verdict wins.
/// A page without any stock signal is `StockStatus::Unknown`.
///
/// The page-text strategy is a vote over the whole body, so unrelated widgets
/// such as "sold out" badges on related products can flip the result.
pub fn extract_stock(document: &Html) -> StockStatus {
    STOCK_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let verdict = strategy(document)?;
            tracing::trace!("Stock resolved by {} strategy: {}", name, verdict);
            Some(verdict)
        })
        .unwrap_or(StockStatus::Unknown)
}

/// Reads the stock status from the primary call-to-action button
pub fn stock_from_cta_button(document: &Html) -> Option<StockStatus> {
    let selector = Selector::parse(CTA_SELECTOR).ok()?;

    document.select(&selector).find_map(|button| {
        let label = element_text(button).to_lowercase();
        if contains_any(&label, OUT_OF_STOCK_PHRASES) {
            Some(StockStatus::OutOfStock)
        } else if contains_any(&label, BUY_PHRASES) {
            Some(StockStatus::InStock)
        } else {
            None
        }
    })
}

/// Reads the stock status from the visible text of the whole page
pub fn stock_from_page_text(document: &Html) -> Option<StockStatus> {
    stock_from_text(&visible_text(document).to_lowercase())
}

/// Classifies lowercase page text by stock phrases
fn stock_from_text(text_lower: &str) -> Option<StockStatus> {
    if contains_any(text_lower, OUT_OF_STOCK_PHRASES) {
        return Some(StockStatus::OutOfStock);
    }
    if contains_any(text_lower, IN_STOCK_PHRASES) {
        return Some(StockStatus::InStock);
    }
    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
