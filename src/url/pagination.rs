/// Builds the URL of a catalog page
///
/// Page 1 is the catalog root exactly as given. Every later page appends a
/// `page=N` query parameter, joined with `&` when the root already carries a
/// query string and with `?` otherwise.
///
/// # Arguments
///
/// * `root` - The catalog root URL
/// * `page` - The 1-based page index
///
/// # Examples
///
/// ```
/// use catalog_harvest::url::catalog_page_url;
///
/// assert_eq!(catalog_page_url("https://x.com/cat", 1), "https://x.com/cat");
/// assert_eq!(catalog_page_url("https://x.com/cat", 3), "https://x.com/cat?page=3");
/// assert_eq!(catalog_page_url("https://x.com/cat?x=1", 2), "https://x.com/cat?x=1&page=2");
/// ```
pub fn catalog_page_url(root: &str, page: u32) -> String {
    if page <= 1 {
        return root.to_string();
    }

    let separator = if root.contains('?') { '&' } else { '?' };
    format!("{}{}page={}", root, separator, page)
}
