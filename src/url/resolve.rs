use url::Url;

/// Path fragment that identifies product detail pages on InSales-style shops
pub const DEFAULT_PRODUCT_MARKER: &str = "/product/";

/// Resolves an href to an absolute product URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - hrefs that fail to join against the base
/// - non-HTTP(S) URLs after resolution
/// - URLs that lost the product marker during resolution
///
/// Query strings and fragments are kept as they are; two hrefs that differ
/// only in their fragment resolve to two distinct product links.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `base_url` - The catalog root used for resolving relative links
/// * `marker` - The product path marker
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::resolve_product_link;
/// use url::Url;
///
/// let base = Url::parse("https://shop.example.com/collection/shoes").unwrap();
/// assert_eq!(
///     resolve_product_link("/product/red-sneaker", &base, "/product/"),
///     Some("https://shop.example.com/product/red-sneaker".to_string())
/// );
/// ```
pub fn resolve_product_link(href: &str, base_url: &Url, marker: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let absolute = base_url.join(href).ok()?;

    // Only accept HTTP and HTTPS URLs
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    let absolute = absolute.to_string();
    if !absolute.contains(marker) {
        return None;
    }

    Some(absolute)
}
