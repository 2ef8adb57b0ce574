use crate::config::types::{Config, CrawlerConfig, SheetsConfig};
use crate::ConfigError;
use url::Url;

/// Largest accepted per-catalog page bound
const MAX_PAGE_BOUND: u32 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;

    if config.user_agent.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    if config.input.catalog_list.is_empty() {
        return Err(ConfigError::Validation(
            "catalog_list cannot be empty".to_string(),
        ));
    }

    if config.output.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty".to_string(),
        ));
    }

    if let Some(sheets) = &config.sheets {
        validate_sheets_config(sheets)?;
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages_per_catalog < 1 || config.max_pages_per_catalog > MAX_PAGE_BOUND {
        return Err(ConfigError::Validation(format!(
            "max_pages_per_catalog must be between 1 and {}, got {}",
            MAX_PAGE_BOUND, config.max_pages_per_catalog
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.product_path_marker.trim().is_empty() {
        return Err(ConfigError::Validation(
            "product_path_marker cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates spreadsheet sink configuration
fn validate_sheets_config(config: &SheetsConfig) -> Result<(), ConfigError> {
    if config.spreadsheet_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "spreadsheet_id cannot be empty".to_string(),
        ));
    }

    if config.sheet_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "sheet_name cannot be empty".to_string(),
        ));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.token_env.is_empty() {
        return Err(ConfigError::Validation(
            "token_env cannot be empty".to_string(),
        ));
    }

    if config.credentials_env.is_empty() {
        return Err(ConfigError::Validation(
            "credentials_env cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;

    Ok(())
}
