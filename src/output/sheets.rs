//! Google Sheets sink
//!
//! Talks to the Sheets REST API (v4) directly:
//!
//! | Step | Request |
//! |------|---------|
//! | start | `POST values/{sheet}:clear`, then `PUT values/{sheet}!A1` with the header |
//! | write | `POST values/{sheet}!A1:append` once per full batch |
//! | finish | `POST values/{sheet}!A1:append` with the remainder |
//!
//! All writes use `valueInputOption=RAW` so that sizes like `42,5` are not
//! reinterpreted as numbers.
//!
//! A failed append keeps its rows buffered; the next `write_rows` or
//! `finish` sends them again. Only a failure during `finish` is returned.

use crate::config::SheetsConfig;
use crate::output::auth::{ServiceAccountTokens, StaticToken, TokenSource};
use crate::output::traits::{OutputError, OutputResult, RowSink};
use crate::product::{OutputRow, OUTPUT_HEADER};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use url::Url;

/// Appends rows to a spreadsheet in batches
pub struct SheetsSink {
    client: Client,
    config: SheetsConfig,
    tokens: Box<dyn TokenSource>,
    buffer: Vec<[String; 6]>,
    rows_sent: u64,
}

impl SheetsSink {
    /// Creates a sink with credentials from the environment
    ///
    /// A bearer token in `config.token_env` wins; otherwise the service
    /// account key in `config.credentials_env` is used.
    ///
    /// # Returns
    ///
    /// * `Ok(SheetsSink)` - Sink ready to `start`
    /// * `Err(OutputError::Credentials)` - Neither variable is usable
    pub async fn from_env(client: Client, config: SheetsConfig) -> OutputResult<Self> {
        if let Some(token) = non_empty_var(&config.token_env) {
            tracing::debug!("Using bearer token from {}", config.token_env);
            return Ok(Self::with_token(client, config, token));
        }

        let encoded = non_empty_var(&config.credentials_env).ok_or_else(|| {
            OutputError::Credentials(format!(
                "neither {} nor {} is set",
                config.token_env, config.credentials_env
            ))
        })?;

        let tokens = ServiceAccountTokens::from_base64(&encoded).await?;
        Ok(Self::with_token_source(client, config, Box::new(tokens)))
    }

    /// Creates a sink with an explicit bearer token
    pub fn with_token(client: Client, config: SheetsConfig, token: impl Into<String>) -> Self {
        Self::with_token_source(client, config, Box::new(StaticToken::new(token)))
    }

    /// Creates a sink that asks `tokens` for a bearer token on every request
    pub fn with_token_source(
        client: Client,
        config: SheetsConfig,
        tokens: Box<dyn TokenSource>,
    ) -> Self {
        Self {
            client,
            config,
            tokens,
            buffer: Vec::new(),
            rows_sent: 0,
        }
    }

    /// Number of data rows appended so far
    pub fn rows_sent(&self) -> u64 {
        self.rows_sent
    }

    /// Builds `{api_base}/v4/spreadsheets/{id}/values/{range}`
    fn values_url(&self, range: &str) -> OutputResult<Url> {
        let mut url = Url::parse(&self.config.api_base)?;
        url.path_segments_mut()
            .map_err(|_| OutputError::Sheets(format!("unusable api base {}", self.config.api_base)))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                range,
            ]);
        Ok(url)
    }

    /// Number of rows waiting for a successful append
    pub fn rows_pending(&self) -> usize {
        self.buffer.len()
    }

    /// Sends a request and maps non-success statuses to errors
    async fn send(&self, action: &str, request: RequestBuilder) -> OutputResult<()> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OutputError::Sheets(format!(
                "{} failed with HTTP {}: {}",
                action,
                status.as_u16(),
                body.trim()
            )));
        }

        Ok(())
    }

    async fn clear(&self) -> OutputResult<()> {
        let url = self.values_url(&format!("{}:clear", self.config.sheet_name))?;
        self.send("clear", self.client.post(url).json(&json!({})))
            .await
    }

    async fn write_header(&self) -> OutputResult<()> {
        let url = self.values_url(&format!("{}!A1", self.config.sheet_name))?;
        let body = json!({ "values": [OUTPUT_HEADER] });
        self.send(
            "header",
            self.client
                .put(url)
                .query(&[("valueInputOption", "RAW")])
                .json(&body),
        )
        .await
    }

    /// Sends the first `count` buffered rows; they leave the buffer only
    /// once the API accepted them
    async fn append(&mut self, count: usize) -> OutputResult<()> {
        let url = self.values_url(&format!("{}!A1:append", self.config.sheet_name))?;
        let body = json!({ "values": &self.buffer[..count] });

        self.send(
            "append",
            self.client
                .post(url)
                .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
                .json(&body),
        )
        .await?;

        self.buffer.drain(..count);
        self.rows_sent += count as u64;
        tracing::debug!("Appended {} rows to sheet {}", count, self.config.sheet_name);
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl RowSink for SheetsSink {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn start(&mut self) -> OutputResult<()> {
        self.clear().await?;
        self.write_header().await?;
        tracing::info!(
            "Cleared sheet {} of spreadsheet {}",
            self.config.sheet_name,
            self.config.spreadsheet_id
        );
        Ok(())
    }

    async fn write_rows(&mut self, rows: &[OutputRow]) -> OutputResult<()> {
        self.buffer.extend(rows.iter().map(OutputRow::to_record));

        while self.buffer.len() >= self.config.batch_size {
            if let Err(e) = self.append(self.config.batch_size).await {
                tracing::warn!(
                    "Append to sheet {} failed, keeping {} rows for retry: {}",
                    self.config.sheet_name,
                    self.buffer.len(),
                    e
                );
                break;
            }
        }

        Ok(())
    }

    async fn finish(&mut self) -> OutputResult<()> {
        if !self.buffer.is_empty() {
            self.append(self.buffer.len()).await?;
        }

        tracing::info!(
            "Sent {} rows to spreadsheet {}",
            self.rows_sent,
            self.config.spreadsheet_id
        );
        Ok(())
    }
}
