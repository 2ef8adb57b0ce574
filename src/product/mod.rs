//! Product data model and row flattening
//!
//! # Components
//!
//! - `ProductRecord`: everything extracted from one product page
//! - `StockStatus`: the derived availability of a product
//! - `OutputRow`: one flat `(product, size)` row as written by the sinks
//! - `flatten`: expands a record into its rows

mod flatten;
mod record;

// Re-export main types
pub use flatten::flatten;
pub use record::{OutputRow, ProductRecord, StockStatus, OUTPUT_HEADER};
