//! Generative-text collaborator: Gemini `generateContent`, used as a fallback
//! to pull an email out of free-form channel descriptions.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::extract::find_email;
use crate::http::{normalize_base_url, read_json, HttpSettings};
use crate::rate_limit::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const SERVICE: &str = "gemini";

/// Descriptions shorter than this (in chars) are not worth a call.
pub const MIN_DESCRIPTION_CHARS: usize = 5;

/// `true` when the regex finds nothing and the description is long enough to
/// possibly hide an obfuscated address.
#[must_use]
pub fn needs_generative(description: &str) -> bool {
    find_email(description).is_none() && description.trim().chars().count() >= MIN_DESCRIPTION_CHARS
}

fn prompt(description: &str) -> String {
    format!("다음 텍스트에서 이메일 주소만 추출해. 없으면 None: {description}")
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().map(|p| p.text.as_str()).collect())
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(api_key: &str, model: &str, settings: &HttpSettings) -> Result<Self, ScraperError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] or [`ScraperError::InvalidBaseUrl`].
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: settings.build_client()?,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: normalize_base_url(base_url)?,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Asks the model for the email in `description`.
    ///
    /// The reply counts only if it contains an email-shaped substring; "None"
    /// or chatter yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] when the call fails after retries.
    pub async fn extract_email(&self, description: &str) -> Result<Option<String>, ScraperError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let text = prompt(description);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &text }],
            }],
        };

        let (url, body) = (&url, &body);
        let response: GenerateResponse =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
                let response = self
                    .client
                    .post(url)
                    .query(&[("key", self.api_key.as_str())])
                    .json(body)
                    .send()
                    .await?;
                read_json(SERVICE, "generateContent", response).await
            })
            .await?;

        let reply = response.text();
        let email = find_email(&reply);
        tracing::debug!(reply = %reply.trim(), found = email.is_some(), "generative reply");
        Ok(email)
    }
}
