//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest crawler.

use anyhow::Context;
use catalog_harvest::config::{
    load_catalog_urls, load_config_with_hash, validate, Config, SheetsConfig,
};
use catalog_harvest::crawler::run_crawl;
use catalog_harvest::output::{print_statistics, CsvSink, RowSink, SheetsSink};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a polite catalog crawler for e-commerce listings
///
/// Walks every catalog listed in the catalog file page by page, visits each
/// product, and writes one row per product size to a CSV file and,
/// optionally, a Google spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A polite catalog crawler for e-commerce listings", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog list, one URL per line
    #[arg(long, value_name = "FILE", env = "CATALOG_LIST")]
    catalogs: Option<PathBuf>,

    /// CSV output path
    #[arg(short, long, value_name = "FILE", env = "OUTPUT_CSV")]
    output: Option<PathBuf>,

    /// Spreadsheet id; enables the Google Sheets sink
    #[arg(long, value_name = "ID", env = "GOOGLE_SHEET_ID")]
    sheet_id: Option<String>,

    /// Rows per spreadsheet append call
    #[arg(long, value_name = "N", env = "SHEETS_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Maximum catalog pages per catalog
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and catalog list and show what would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    let catalog_path = Path::new(&config.input.catalog_list);
    let catalogs = load_catalog_urls(catalog_path).with_context(|| {
        format!("Failed to load catalog list {}", catalog_path.display())
    })?;

    if cli.dry_run {
        handle_dry_run(&config, &catalogs);
        return Ok(());
    }

    if catalogs.is_empty() {
        tracing::info!(
            "No catalogs listed in {}, nothing to do",
            catalog_path.display()
        );
        return Ok(());
    }

    handle_crawl(&config, &catalogs).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line and env overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(path) = &cli.catalogs {
        config.input.catalog_list = path.display().to_string();
    }

    if let Some(path) = &cli.output {
        config.output.csv_path = path.display().to_string();
    }

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages_per_catalog = max_pages;
    }

    if let Some(sheet_id) = cli.sheet_id.as_deref().map(str::trim) {
        if !sheet_id.is_empty() {
            match config.sheets.as_mut() {
                Some(sheets) => sheets.spreadsheet_id = sheet_id.to_string(),
                None => config.sheets = Some(SheetsConfig::new(sheet_id)),
            }
        }
    }

    if let (Some(batch_size), Some(sheets)) = (cli.batch_size, config.sheets.as_mut()) {
        sheets.batch_size = batch_size;
    }

    validate(&config).context("Invalid configuration")?;

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, catalogs: &[String]) {
    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Max pages per catalog: {}",
        config.crawler.max_pages_per_catalog
    );
    println!("  Product delay: {}ms", config.crawler.product_delay_ms);
    println!("  Page delay: {}ms", config.crawler.page_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Product marker: {}", config.crawler.product_path_marker);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    match &config.sheets {
        Some(sheets) => println!(
            "  Sheets: {} / {} (batch {}, key from ${}, token override ${})",
            sheets.spreadsheet_id,
            sheets.sheet_name,
            sheets.batch_size,
            sheets.credentials_env,
            sheets.token_env
        ),
        None => println!("  Sheets: disabled"),
    }

    println!(
        "\nCatalogs ({}) from {}:",
        catalogs.len(),
        config.input.catalog_list
    );
    for catalog in catalogs {
        println!("  - {}", catalog);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} catalogs", catalogs.len());
}

/// Builds the output sinks for this run
///
/// The CSV sink comes first so the local copy is written before any
/// spreadsheet call can fail.
async fn build_sinks(config: &Config) -> anyhow::Result<Vec<Box<dyn RowSink>>> {
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&config.output.csv_path))];

    if let Some(sheets) = &config.sheets {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
            .build()?;
        let sink = SheetsSink::from_env(client, sheets.clone())
            .await
            .context("Failed to initialize the spreadsheet sink")?;
        sinks.push(Box::new(sink));
    } else {
        tracing::info!("No spreadsheet configured, writing CSV only");
    }

    Ok(sinks)
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, catalogs: &[String]) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting {} catalogs (at most {} pages each)",
        catalogs.len(),
        config.crawler.max_pages_per_catalog
    );

    let mut sinks = build_sinks(config).await?;

    match run_crawl(config, catalogs, &mut sinks).await {
        Ok(stats) => {
            tracing::info!("Harvest completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
