//! Text helpers shared by the field extractors
//!
//! Text is always taken from rendered content: `script`, `style`, `noscript`
//! and `template` subtrees are skipped, and the document head is never read.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose content never reaches the screen
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Collapses every whitespace run to a single space and trims the ends
///
/// # Examples
///
/// ```
/// use catalog_harvest::extract::clean_text;
///
/// assert_eq!(clean_text("  Black\n\t  leather \u{a0}"), "Black leather");
/// ```
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the non-empty, whitespace-normalized text fragments of an element
/// in document order
///
/// Each fragment corresponds to one text node, so `<b>Color:</b> Red` yields
/// two fragments.
pub fn fragments(element: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    collect_fragments(element, &mut out);
    out
}

fn collect_fragments(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let cleaned = clean_text(text);
                if !cleaned.is_empty() {
                    out.push(cleaned);
                }
            }
            Node::Element(el) => {
                if HIDDEN_ELEMENTS.contains(&el.name()) {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_fragments(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

/// Returns the full text of an element, fragments joined by single spaces
pub fn element_text(element: ElementRef<'_>) -> String {
    fragments(element).join(" ")
}

/// Returns the `<body>` element, or the root element for fragments without one
pub fn page_body(document: &Html) -> ElementRef<'_> {
    Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

/// Returns the visible text of the whole page
pub fn visible_text(document: &Html) -> String {
    element_text(page_body(document))
}
