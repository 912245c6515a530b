//! Web-search collaborator: the Apify Google Search scraper actor, called
//! synchronously through `run-sync-get-dataset-items`.

use glowup_core::{Platform, SearchResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;
use crate::http::{normalize_base_url, read_json, HttpSettings};
use crate::rate_limit::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://api.apify.com/v2";
const SERVICE: &str = "apify";

/// Results per search page requested from the actor.
pub const RESULTS_PER_PAGE: u32 = 20;

/// Terms that make a snippet likely to carry a contact address.
const CONTACT_TERMS: &str = r#"("@gmail.com" OR "@naver.com" OR "이메일" OR "email" OR "협찬" OR "dm")"#;

/// Terms that mark shops, salons, classes and institutions.
const EXCLUDED_TERMS: &str = r#"-"예약" -"오픈카톡" -"카카오채널" -"스튜디오" -"원장" -"살롱" -"클래스" -"진단" -"공식" -"official" -"정부" -"공공기관" -"센터" -"협회""#;

/// `site:`-restricted creator query for one keyword.
#[must_use]
pub fn creator_query(platform: Platform, keyword: &str) -> String {
    let mut query = format!(
        "site:{} {} {CONTACT_TERMS} {EXCLUDED_TERMS}",
        platform.domain(),
        keyword.trim()
    );
    match platform {
        Platform::Instagram => query.push_str(" -inurl:tags -inurl:explore"),
        Platform::TikTok => query.push_str(" -inurl:tag"),
        Platform::YouTube => {}
    }
    query
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchInput<'a> {
    queries: &'a str,
    max_pages_per_query: u32,
    results_per_page: u32,
    country_code: &'a str,
    language_code: &'a str,
}

/// One dataset item: a single search page.
#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default, rename = "organicResults")]
    organic_results: Vec<SearchResult>,
}

/// Client for the Google Search scraper actor.
pub struct ApifySearchClient {
    client: Client,
    token: String,
    actor_id: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl ApifySearchClient {
    /// Creates a client pointed at the production Apify API.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(token: &str, actor_id: &str, settings: &HttpSettings) -> Result<Self, ScraperError> {
        Self::with_base_url(token, actor_id, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the client cannot be built, or
    /// [`ScraperError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    pub fn with_base_url(
        token: &str,
        actor_id: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: settings.build_client()?,
            token: token.to_owned(),
            actor_id: actor_id.to_owned(),
            base_url: normalize_base_url(base_url)?,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Runs one query across `max_pages` result pages and returns every
    /// organic result, page order preserved.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] if the actor run fails after retries or its
    /// output does not parse.
    pub async fn search(
        &self,
        query: &str,
        max_pages: u32,
    ) -> Result<Vec<SearchResult>, ScraperError> {
        let url = format!(
            "{}/acts/{}/run-sync-get-dataset-items",
            self.base_url, self.actor_id
        );
        let input = SearchInput {
            queries: query,
            max_pages_per_query: max_pages.max(1),
            results_per_page: RESULTS_PER_PAGE,
            country_code: "kr",
            language_code: "ko",
        };

        tracing::info!(query, max_pages, "running search actor");

        let (url, input) = (&url, &input);
        let pages: Vec<SearchPage> =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
                let response = self
                    .client
                    .post(url)
                    .bearer_auth(&self.token)
                    .json(input)
                    .send()
                    .await?;
                read_json(SERVICE, "search dataset", response).await
            })
            .await?;

        let results: Vec<SearchResult> = pages
            .into_iter()
            .flat_map(|page| page.organic_results)
            .collect();
        tracing::info!(query, results = results.len(), "search actor finished");
        Ok(results)
    }
}
