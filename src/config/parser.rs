use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Page bound: {}", config.crawler.max_pages_per_catalog);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so that two runs can be matched to the same settings.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-pages-per-catalog = 50
product-delay-ms = 250
page-delay-ms = 1000
request-timeout-secs = 15
product-path-marker = "/item/"

[user-agent]
value = "TestBrowser/1.0"

[input]
catalog-list = "lists/catalogs.txt"

[output]
csv-path = "out/rows.csv"

[sheets]
spreadsheet-id = "1AbCdEf"
batch-size = 100
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages_per_catalog, 50);
        assert_eq!(config.crawler.product_delay_ms, 250);
        assert_eq!(config.crawler.product_path_marker, "/item/");
        assert_eq!(config.user_agent.value, "TestBrowser/1.0");
        assert_eq!(config.input.catalog_list, "lists/catalogs.txt");
        assert_eq!(config.output.csv_path, "out/rows.csv");

        let sheets = config.sheets.unwrap();
        assert_eq!(sheets.spreadsheet_id, "1AbCdEf");
        assert_eq!(sheets.batch_size, 100);
        assert_eq!(sheets.sheet_name, "Sheet1");
        assert_eq!(sheets.token_env, "GOOGLE_SHEETS_TOKEN");
        assert_eq!(sheets.credentials_env, "GOOGLE_SERVICE_ACCOUNT_JSON_B64");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages_per_catalog, 200);
        assert_eq!(config.crawler.request_timeout_secs, 30);
        assert_eq!(config.crawler.product_path_marker, "/product/");
        assert_eq!(config.output.csv_path, "output.csv");
        assert!(config.sheets.is_none());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let file = create_temp_config("[crawler]\npage-delay-ms = 5\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.page_delay_ms, 5);
        assert_eq!(config.crawler.product_delay_ms, 600);
    }

    #[test]
    fn test_sheets_requires_id() {
        let file = create_temp_config("[sheets]\nbatch-size = 10\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-pages-per-catalog = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        // Same content should produce same hash
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_load_config_with_hash() {
        let file = create_temp_config("[output]\ncsv-path = \"a.csv\"\n");
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.output.csv_path, "a.csv");
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }
}
