use serde::Deserialize;

/// Browser-like identity sent with every catalog and product request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/122.0 Safari/537.36";

/// Main configuration structure for Catalog-Harvest
///
/// Every section has defaults, so an empty file (or no file at all) is a
/// valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    /// Spreadsheet sink; disabled when absent
    pub sheets: Option<SheetsConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Hard bound on catalog pages fetched per catalog root
    pub max_pages_per_catalog: u32,

    /// Pause after every product fetch (milliseconds)
    pub product_delay_ms: u64,

    /// Pause after every catalog page (milliseconds)
    pub page_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Path fragment identifying product detail links
    pub product_path_marker: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages_per_catalog: 200,
            product_delay_ms: 600,
            page_delay_ms: 800,
            request_timeout_secs: 30,
            product_path_marker: crate::url::DEFAULT_PRODUCT_MARKER.to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct InputConfig {
    /// Path to the catalog list (one URL per line)
    pub catalog_list: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            catalog_list: "catalog.txt".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the CSV file written for every run
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "output.csv".to_string(),
        }
    }
}

/// Google Sheets sink configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SheetsConfig {
    /// Spreadsheet key (the id in the sheet's URL)
    pub spreadsheet_id: String,

    /// Worksheet (tab) name
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Rows buffered before each append call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Environment variable holding a ready OAuth bearer token; overrides
    /// the service account when set
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Environment variable holding the base64-encoded service account key
    #[serde(default = "default_credentials_env")]
    pub credentials_env: String,

    /// Base URL of the Sheets API
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl SheetsConfig {
    /// Creates a sheets configuration with defaults for everything but the id
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: default_sheet_name(),
            batch_size: default_batch_size(),
            token_env: default_token_env(),
            credentials_env: default_credentials_env(),
            api_base: default_api_base(),
        }
    }
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_batch_size() -> usize {
    300
}

fn default_token_env() -> String {
    "GOOGLE_SHEETS_TOKEN".to_string()
}

fn default_credentials_env() -> String {
    "GOOGLE_SERVICE_ACCOUNT_JSON_B64".to_string()
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}
