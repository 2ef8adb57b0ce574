//! Configuration module for Catalog-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and reading the catalog list.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling at most {} pages per catalog", config.crawler.max_pages_per_catalog);
//! ```

mod catalogs;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, InputConfig, OutputConfig, SheetsConfig, UserAgentConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use catalogs::{load_catalog_urls, parse_catalog_list};
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
