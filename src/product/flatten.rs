use crate::product::{OutputRow, ProductRecord};

/// Expands a product record into output rows
///
/// A record with k sizes yields k rows in size order, every other field
/// copied verbatim. A record without sizes yields exactly one row whose size
/// field is empty.
///
/// # Examples
///
/// ```
/// use catalog_harvest::product::{flatten, ProductRecord, StockStatus};
///
/// let record = ProductRecord {
///     url: "https://x.com/product/a".to_string(),
///     name: "Sneaker".to_string(),
///     category: String::new(),
///     color: String::new(),
///     sizes: vec!["41".to_string(), "42".to_string()],
///     stock: StockStatus::Unknown,
/// };
/// assert_eq!(flatten(&record).len(), 2);
/// ```
pub fn flatten(record: &ProductRecord) -> Vec<OutputRow> {
    let row_for = |size: &str| OutputRow {
        url: record.url.clone(),
        name: record.name.clone(),
        category: record.category.clone(),
        color: record.color.clone(),
        size: size.to_string(),
        stock: record.stock,
    };

    if record.sizes.is_empty() {
        return vec![row_for("")];
    }

    record.sizes.iter().map(|size| row_for(size)).collect()
}
