//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock shops and run the full harvest
//! cycle end-to-end: catalog pagination, product assembly, and sinks.

use catalog_harvest::config::{Config, SheetsConfig};
use catalog_harvest::crawler::run_crawl;
use catalog_harvest::output::{CsvSink, RowSink, SheetsSink};
use catalog_harvest::WalkEnd;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches catalog requests for page 1, which carry no `page` parameter
struct FirstPage;

impl Match for FirstPage {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "page")
    }
}

/// Creates a test configuration without pacing delays
fn create_test_config(max_pages: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_pages_per_catalog = max_pages;
    config.crawler.product_delay_ms = 0;
    config.crawler.page_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV output");
    reader
        .records()
        .map(|record| {
            record
                .expect("Failed to read CSV record")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

async fn mount_catalog_page(server: &MockServer, page: Option<&str>, body: &str, expected: u64) {
    let mock = Mock::given(method("GET")).and(path("/catalog"));
    let mock = match page {
        Some(page) => mock.and(query_param("page", page)),
        None => mock.and(FirstPage),
    };
    mock.respond_with(html(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_product(server: &MockServer, slug: &str, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/product/{}", slug)))
        .respond_with(html(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_harvest_two_pages() {
    let server = MockServer::start().await;

    mount_catalog_page(
        &server,
        None,
        r#"<a href="/product/linen-shirt">Linen Shirt</a>
           <a href="/product/canvas-tote">Canvas Tote</a>
           <a href="/catalog?page=2">Next</a>"#,
        1,
    )
    .await;
    mount_catalog_page(&server, Some("2"), "<p>Nothing more</p>", 1).await;
    mount_catalog_page(&server, Some("3"), "", 0).await;

    mount_product(
        &server,
        "linen-shirt",
        r#"<nav class="breadcrumbs"><a href="/">Home</a><a href="/men">Men</a><a href="/men/shirts">Shirts</a></nav>
           <h1>Linen Shirt</h1>
           <p>Color: White</p>
           <select name="size"><option>S</option><option>M</option></select>
           <button class="add-to-cart">Add to cart</button>"#,
        1,
    )
    .await;
    mount_product(
        &server,
        "canvas-tote",
        "<h1>Canvas Tote</h1><p>Sold out</p>",
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&csv_path))];

    let catalogs = vec![format!("{}/catalog", server.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .expect("Harvest failed");

    assert_eq!(stats.catalogs_crawled, 1);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.products_assembled, 2);
    assert_eq!(stats.products_failed, 0);
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.catalogs_ended(WalkEnd::Exhausted), 1);
    assert!(stats.finished_at.is_some());

    let shirt_url = format!("{}/product/linen-shirt", server.uri());
    let tote_url = format!("{}/product/canvas-tote", server.uri());

    let rows = read_csv(&csv_path);
    assert_eq!(
        rows,
        vec![
            vec![
                shirt_url.clone(),
                "Linen Shirt".to_string(),
                "Home / Men / Shirts".to_string(),
                "White".to_string(),
                "S".to_string(),
                "in_stock".to_string(),
            ],
            vec![
                shirt_url,
                "Linen Shirt".to_string(),
                "Home / Men / Shirts".to_string(),
                "White".to_string(),
                "M".to_string(),
                "in_stock".to_string(),
            ],
            vec![
                tote_url,
                "Canvas Tote".to_string(),
                String::new(),
                String::new(),
                String::new(),
                "out_of_stock".to_string(),
            ],
        ]
    );
}

#[tokio::test]
async fn test_empty_first_page() {
    let server = MockServer::start().await;

    mount_catalog_page(&server, None, "<p>No products yet</p>", 1).await;
    mount_catalog_page(&server, Some("2"), "", 0).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&csv_path))];

    let catalogs = vec![format!("{}/catalog", server.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.rows_written, 0);
    assert_eq!(stats.catalogs_ended(WalkEnd::Exhausted), 1);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(content, "url,name,category,color,size,stock\n");
}

#[tokio::test]
async fn test_duplicate_links_across_pages() {
    let server = MockServer::start().await;

    mount_catalog_page(
        &server,
        None,
        r#"<a href="/product/a">A</a><a href="/product/b">B</a>"#,
        1,
    )
    .await;
    mount_catalog_page(
        &server,
        Some("2"),
        r#"<a href="/product/b">B</a><a href="/product/c">C</a>"#,
        1,
    )
    .await;
    mount_catalog_page(&server, Some("3"), "", 1).await;

    mount_product(&server, "a", "<h1>A</h1>", 1).await;
    mount_product(&server, "b", "<h1>B</h1>", 1).await;
    mount_product(&server, "c", "<h1>C</h1>", 1).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&csv_path))];

    let catalogs = vec![format!("{}/catalog", server.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.products_assembled, 3);
    assert_eq!(stats.duplicate_links, 1);

    let names: Vec<String> = read_csv(&csv_path)
        .into_iter()
        .map(|row| row[1].clone())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_failed_catalog_does_not_stop_run() {
    let broken = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&broken)
        .await;

    let healthy = MockServer::start().await;
    mount_catalog_page(&healthy, None, r#"<a href="/product/a">A</a>"#, 1).await;
    mount_catalog_page(&healthy, Some("2"), "", 1).await;
    mount_product(&healthy, "a", "<h1>A</h1><label>XL</label>", 1).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&csv_path))];

    let catalogs = vec![
        format!("{}/catalog", broken.uri()),
        format!("{}/catalog", healthy.uri()),
    ];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.catalogs_crawled, 2);
    assert_eq!(stats.catalogs_ended(WalkEnd::FetchFailed), 1);
    assert_eq!(stats.catalogs_ended(WalkEnd::Exhausted), 1);

    let rows = read_csv(&csv_path);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][4], "XL");
}

#[tokio::test]
async fn test_failed_product_is_skipped() {
    let server = MockServer::start().await;

    mount_catalog_page(
        &server,
        None,
        r#"<a href="/product/gone">Gone</a><a href="/product/here">Here</a>"#,
        1,
    )
    .await;
    mount_catalog_page(&server, Some("2"), "", 1).await;

    Mock::given(method("GET"))
        .and(path("/product/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, "here", "<h1>Here</h1>", 1).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(CsvSink::new(&csv_path))];

    let catalogs = vec![format!("{}/catalog", server.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.products_failed, 1);
    assert_eq!(stats.products_assembled, 1);
    assert_eq!(read_csv(&csv_path).len(), 1);
}

#[tokio::test]
async fn test_page_limit() {
    let server = MockServer::start().await;

    mount_catalog_page(&server, None, r#"<a href="/product/p1">1</a>"#, 1).await;
    mount_catalog_page(&server, Some("2"), r#"<a href="/product/p2">2</a>"#, 1).await;
    mount_catalog_page(&server, Some("3"), r#"<a href="/product/p3">3</a>"#, 0).await;
    mount_product(&server, "p1", "<h1>P1</h1>", 1).await;
    mount_product(&server, "p2", "<h1>P2</h1>", 1).await;
    mount_product(&server, "p3", "<h1>P3</h1>", 0).await;

    let dir = TempDir::new().unwrap();
    let mut sinks: Vec<Box<dyn RowSink>> =
        vec![Box::new(CsvSink::new(dir.path().join("output.csv")))];

    let catalogs = vec![format!("{}/catalog", server.uri())];
    let stats = run_crawl(&create_test_config(2), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.products_assembled, 2);
    assert_eq!(stats.catalogs_ended(WalkEnd::PageLimit), 1);
}

#[tokio::test]
async fn test_root_with_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalog"))
        .and(query_param("sort", "new"))
        .and(FirstPage)
        .respond_with(html(r#"<a href="/product/a">A</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/catalog"))
        .and(query_param("sort", "new"))
        .and(query_param("page", "2"))
        .respond_with(html(""))
        .expect(1)
        .mount(&server)
        .await;
    mount_product(&server, "a", "<h1>A</h1>", 1).await;

    let dir = TempDir::new().unwrap();
    let mut sinks: Vec<Box<dyn RowSink>> =
        vec![Box::new(CsvSink::new(dir.path().join("output.csv")))];

    let catalogs = vec![format!("{}/catalog?sort=new", server.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.rows_written, 1);
}

#[tokio::test]
async fn test_rows_reach_spreadsheet_and_csv() {
    let shop = MockServer::start().await;
    mount_catalog_page(
        &shop,
        None,
        r#"<a href="/product/a">A</a><a href="/product/b">B</a>"#,
        1,
    )
    .await;
    mount_catalog_page(&shop, Some("2"), "", 1).await;
    mount_product(
        &shop,
        "a",
        "<h1>A</h1><select><option>EU 40</option><option>EU 41</option></select>",
        1,
    )
    .await;
    mount_product(&shop, "b", "<h1>B</h1>", 1).await;

    let sheets_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1:clear"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sheets_api)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1!A1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&sheets_api)
        .await;
    // 3 rows with a batch size of 2: one full batch, then the remainder on finish
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1!A1:append"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&sheets_api)
        .await;

    let mut sheets_config = SheetsConfig::new("sheet-xyz");
    sheets_config.api_base = sheets_api.uri();
    sheets_config.batch_size = 2;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![
        Box::new(CsvSink::new(&csv_path)),
        Box::new(SheetsSink::with_token(
            reqwest::Client::new(),
            sheets_config,
            "token",
        )),
    ];

    let catalogs = vec![format!("{}/catalog", shop.uri())];
    let stats = run_crawl(&create_test_config(200), &catalogs, &mut sinks)
        .await
        .unwrap();

    assert_eq!(stats.rows_written, 3);
    assert_eq!(read_csv(&csv_path).len(), 3);
}

#[tokio::test]
async fn test_spreadsheet_start_failure_is_fatal() {
    let shop = MockServer::start().await;
    mount_catalog_page(&shop, None, "", 0).await;

    let sheets_api = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&sheets_api)
        .await;

    let mut sheets_config = SheetsConfig::new("sheet-xyz");
    sheets_config.api_base = sheets_api.uri();

    let mut sinks: Vec<Box<dyn RowSink>> = vec![Box::new(SheetsSink::with_token(
        reqwest::Client::new(),
        sheets_config,
        "expired",
    ))];

    let catalogs = vec![format!("{}/catalog", shop.uri())];
    let result = run_crawl(&create_test_config(200), &catalogs, &mut sinks).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_spreadsheet_append_failure_keeps_harvesting() {
    let first_shop = MockServer::start().await;
    mount_catalog_page(&first_shop, None, r#"<a href="/product/a">A</a>"#, 1).await;
    mount_catalog_page(&first_shop, Some("2"), "", 1).await;
    mount_product(
        &first_shop,
        "a",
        "<h1>A</h1><select><option>EU 40</option><option>EU 41</option></select>",
        1,
    )
    .await;

    let second_shop = MockServer::start().await;
    mount_catalog_page(&second_shop, None, r#"<a href="/product/b">B</a>"#, 1).await;
    mount_catalog_page(&second_shop, Some("2"), "", 1).await;
    mount_product(&second_shop, "b", "<h1>B</h1>", 1).await;

    let sheets_api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1:clear"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sheets_api)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1!A1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&sheets_api)
        .await;
    Mock::given(method("POST"))
        .and(path("/v4/spreadsheets/sheet-xyz/values/Sheet1!A1:append"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&sheets_api)
        .await;

    let mut sheets_config = SheetsConfig::new("sheet-xyz");
    sheets_config.api_base = sheets_api.uri();
    sheets_config.batch_size = 1;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("output.csv");
    let mut sinks: Vec<Box<dyn RowSink>> = vec![
        Box::new(CsvSink::new(&csv_path)),
        Box::new(SheetsSink::with_token(
            reqwest::Client::new(),
            sheets_config,
            "expired",
        )),
    ];

    let catalogs = vec![
        format!("{}/catalog", first_shop.uri()),
        format!("{}/catalog", second_shop.uri()),
    ];
    let result = run_crawl(&create_test_config(200), &catalogs, &mut sinks).await;

    // The rows never reached the spreadsheet, so the run still fails
    assert!(result.is_err());

    let rows = read_csv(&csv_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][4], "EU 40");
    assert_eq!(rows[1][4], "EU 41");
    assert!(rows[2][0].ends_with("/product/b"));
}
