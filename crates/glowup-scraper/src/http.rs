//! Shared HTTP plumbing for the collaborator clients.

use std::time::Duration;

use glowup_core::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ScraperError;

/// Longest error body kept in [`ScraperError::UnexpectedStatus`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Timeout, identification and retry policy shared by every client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^(n-1)`.
    pub backoff_base_ms: u64,
}

impl HttpSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.scraper_request_timeout_secs,
            user_agent: config.scraper_user_agent.clone(),
            max_retries: config.scraper_max_retries,
            backoff_base_ms: config.scraper_retry_backoff_base_ms,
        }
    }

    /// Builds the underlying `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be constructed.
    pub(crate) fn build_client(&self) -> Result<Client, ScraperError> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// Strips trailing slashes so paths can be appended with `format!`.
pub(crate) fn normalize_base_url(base_url: &str) -> Result<String, ScraperError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ScraperError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "expected an http(s) URL".to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// Maps the status to a typed error, then parses the body as `T`.
///
/// # Errors
///
/// - [`ScraperError::RateLimited`] on 429.
/// - [`ScraperError::Api`] on a 4xx whose body carries a structured `error.message`.
/// - [`ScraperError::UnexpectedStatus`] on any other non-2xx.
/// - [`ScraperError::Deserialize`] if the body does not parse.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    context: &str,
    response: Response,
) -> Result<T, ScraperError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(ScraperError::RateLimited {
            service,
            retry_after_secs,
        });
    }

    let body = response.text().await?;

    if !status.is_success() {
        if status.is_client_error() {
            if let Some(message) = api_error_message(&body) {
                return Err(ScraperError::Api { service, message });
            }
        }
        return Err(ScraperError::UnexpectedStatus {
            service,
            status: status.as_u16(),
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }

    serde_json::from_str(&body).map_err(|e| ScraperError::Deserialize {
        context: format!("{service} {context}"),
        source: e,
    })
}

/// `error.message` (Google and Apify style) or a bare string `error`.
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(serde_json::Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_owned)
}
