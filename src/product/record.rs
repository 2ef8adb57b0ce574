//! Product records and output rows
//!
//! A `ProductRecord` is built once per product fetch and never updated; it is
//! consumed by the row flattener.

use std::fmt;

/// Column names of an output row, in write order
pub const OUTPUT_HEADER: [&str; 6] = ["url", "name", "category", "color", "size", "stock"];

/// Availability of a product as derived from its page
///
/// `Unknown` is an expected outcome when a page carries no stock signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StockStatus {
    /// The page advertises the product as purchasable
    InStock,

    /// The page advertises the product as sold out
    OutOfStock,

    /// No stock signal was found
    #[default]
    Unknown,
}

impl StockStatus {
    /// Converts the status to its output string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::OutOfStock => "out_of_stock",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attributes extracted from one product page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    /// The product link the record was assembled from
    pub url: String,

    /// Text of the first top-level heading (may be empty)
    pub name: String,

    /// Breadcrumb path, at most the last four segments joined with " / "
    pub category: String,

    /// Best-effort color (may be empty)
    pub color: String,

    /// Normalized size tokens in first-seen order, without duplicates
    pub sizes: Vec<String>,

    /// Derived stock status
    pub stock: StockStatus,
}

/// One flat output row: a product paired with a single size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputRow {
    pub url: String,
    pub name: String,
    pub category: String,
    pub color: String,
    pub size: String,
    pub stock: StockStatus,
}

impl OutputRow {
    /// Returns the row as strings in `OUTPUT_HEADER` order
    pub fn to_record(&self) -> [String; 6] {
        [
            self.url.clone(),
            self.name.clone(),
            self.category.clone(),
            self.color.clone(),
            self.size.clone(),
            self.stock.as_str().to_string(),
        ]
    }
}
