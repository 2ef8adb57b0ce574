//! Catalog list loading
//!
//! The catalog list is a plain text file with one catalog root per line.
//! Blank lines and lines starting with `#` are ignored.

use crate::url::parse_catalog_root;
use crate::ConfigError;
use std::path::Path;

/// Loads catalog roots from a list file
///
/// # Arguments
///
/// * `path` - Path to the catalog list
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Catalog roots in file order (possibly empty)
/// * `Err(ConfigError)` - The file can't be read or holds an invalid URL
pub fn load_catalog_urls(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_list(&content)
}

/// Parses the content of a catalog list
pub fn parse_catalog_list(content: &str) -> Result<Vec<String>, ConfigError> {
    let mut roots = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        parse_catalog_root(line).map_err(|e| {
            ConfigError::InvalidUrl(format!("line {}: {}", index + 1, e))
        })?;

        roots.push(line.to_string());
    }

    Ok(roots)
}
