//! Access tokens for the Sheets API
//!
//! The usual credential is a service account key, stored base64-encoded in
//! an environment variable. Tokens are minted on first use and refreshed by
//! the authenticator once they expire, so a long harvest never outlives its
//! token. A ready bearer token can be supplied instead for quick runs.

use crate::output::traits::{OutputError, OutputResult};
use async_trait::async_trait;
use base64::Engine;
use yup_oauth2::authenticator::DefaultAuthenticator;
use yup_oauth2::ServiceAccountAuthenticator;

/// Scopes requested for the service account
pub const SHEETS_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// Supplies a bearer token for each Sheets API request
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> OutputResult<String>;
}

/// A fixed bearer token
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> OutputResult<String> {
        Ok(self.0.clone())
    }
}

/// Tokens minted from a service account key
pub struct ServiceAccountTokens {
    authenticator: DefaultAuthenticator,
}

impl ServiceAccountTokens {
    /// Builds an authenticator from a base64-encoded service account key
    ///
    /// # Returns
    ///
    /// * `Ok(ServiceAccountTokens)` - Key parsed; no token requested yet
    /// * `Err(OutputError::Credentials)` - The key is not base64, not JSON,
    ///   or not a service account key
    pub async fn from_base64(encoded: &str) -> OutputResult<Self> {
        let key_json = decode_service_account_key(encoded)?;
        let key = yup_oauth2::parse_service_account_key(key_json.as_bytes()).map_err(|e| {
            OutputError::Credentials(format!("invalid service account key: {}", e))
        })?;

        tracing::debug!("Authenticating as service account {}", key.client_email);

        let authenticator = ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|e| {
                OutputError::Credentials(format!("failed to build authenticator: {}", e))
            })?;

        Ok(Self { authenticator })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> OutputResult<String> {
        let token = self
            .authenticator
            .token(SHEETS_SCOPES)
            .await
            .map_err(|e| OutputError::Credentials(format!("token request failed: {}", e)))?;

        token.token().map(str::to_string).ok_or_else(|| {
            OutputError::Credentials("token response carried no access token".to_string())
        })
    }
}

/// Decodes a base64 service account key into its JSON text
pub fn decode_service_account_key(encoded: &str) -> OutputResult<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| {
            OutputError::Credentials(format!("service account key is not valid base64: {}", e))
        })?;

    let text = String::from_utf8(bytes).map_err(|_| {
        OutputError::Credentials("decoded service account key is not UTF-8".to_string())
    })?;

    let text = text.trim();
    if !text.starts_with('{') {
        return Err(OutputError::Credentials(
            "decoded service account key is not a JSON object".to_string(),
        ));
    }

    Ok(text.to_string())
}
