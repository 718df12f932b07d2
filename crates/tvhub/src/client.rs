//! HTTP client for a running tvhub server's admin API

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;
use tvhub_core::AppConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("unauthorized: the access key is missing or invalid")]
    Unauthorized,

    #[error("server answered {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Admin API client
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AdminClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn config_url(&self) -> String {
        format!("{}/api/config", self.base_url)
    }

    /// Public subscription URL served by the same server
    pub fn subscribe_url(&self) -> String {
        format!("{}/subscribe", self.base_url)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or_default())
    }

    /// GET /api/config
    pub async fn fetch_config(&self) -> Result<AppConfig, ClientError> {
        debug!(url = %self.config_url(), "fetching configuration");
        let response = self
            .client
            .get(self.config_url())
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await?;
        let text = Self::check(response).await?;
        serde_json::from_str(&text).map_err(ClientError::Decode)
    }

    /// POST /api/config, replacing the whole document
    pub async fn save_config(&self, config: &AppConfig) -> Result<(), ClientError> {
        debug!(url = %self.config_url(), sources = config.sources.len(), "saving configuration");
        let response = self
            .client
            .post(self.config_url())
            .header(AUTHORIZATION, self.bearer())
            .json(config)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn check(response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                status,
                body: error_message(&body),
            });
        }
        Ok(body)
    }
}

/// Pull the `error` field out of a JSON error body, or return the body as-is
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
