//! Video-platform collaborator: YouTube Data API v3 `search` and `channels`.

use std::collections::HashSet;
use std::str::FromStr;

use glowup_core::{ExtractedContact, Platform};
use reqwest::Client;
use serde::Deserialize;

use crate::error::ScraperError;
use crate::http::{normalize_base_url, read_json, HttpSettings};
use crate::rate_limit::retry_with_backoff;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const SERVICE: &str = "youtube";

/// Quota units one `search.list` call costs.
pub const SEARCH_QUOTA_COST: i64 = 100;

/// `channels.list` accepts at most this many ids per call.
const CHANNELS_PER_REQUEST: usize = 50;

/// Audience-size band used to narrow channel results. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriberRange {
    #[default]
    All,
    Under10k,
    From10kTo50k,
    From50kTo100k,
    From100kTo500k,
    From500kTo1m,
}

impl SubscriberRange {
    #[must_use]
    pub fn bounds(self) -> (i64, i64) {
        match self {
            SubscriberRange::All => (0, 100_000_000),
            SubscriberRange::Under10k => (0, 10_000),
            SubscriberRange::From10kTo50k => (10_000, 50_000),
            SubscriberRange::From50kTo100k => (50_000, 100_000),
            SubscriberRange::From100kTo500k => (100_000, 500_000),
            SubscriberRange::From500kTo1m => (500_000, 1_000_000),
        }
    }

    #[must_use]
    pub fn contains(self, subscribers: i64) -> bool {
        let (min, max) = self.bounds();
        (min..=max).contains(&subscribers)
    }
}

impl FromStr for SubscriberRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "전체" => Ok(SubscriberRange::All),
            "under-10k" | "1만미만" => Ok(SubscriberRange::Under10k),
            "10k-50k" => Ok(SubscriberRange::From10kTo50k),
            "50k-100k" => Ok(SubscriberRange::From50kTo100k),
            "100k-500k" => Ok(SubscriberRange::From100kTo500k),
            "500k-1m" => Ok(SubscriberRange::From500kTo1m),
            other => Err(format!(
                "unknown subscriber range '{other}' (expected all, under-10k, 10k-50k, 50k-100k, 100k-500k, 500k-1m)"
            )),
        }
    }
}

/// Search region. Only the markets the outreach team works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Region {
    #[default]
    Kr,
    Us,
    Jp,
}

impl Region {
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Region::Kr => "KR",
            Region::Us => "US",
            Region::Jp => "JP",
        }
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KR" => Ok(Region::Kr),
            "US" => Ok(Region::Us),
            "JP" => Ok(Region::Jp),
            other => Err(format!("unknown region '{other}' (expected KR, US, JP)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchSnippet {
    channel_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: ChannelStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelSnippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    /// The API encodes counts as decimal strings.
    subscriber_count: Option<String>,
}

/// A channel as the collection pipeline needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Zero when the channel hides its count.
    pub subscriber_count: i64,
}

impl Channel {
    #[must_use]
    pub fn url(&self) -> String {
        format!("https://youtube.com/channel/{}", self.id)
    }

    /// Builds the contact for this channel once an email has been found.
    #[must_use]
    pub fn into_contact(self, email: String, category: &str) -> ExtractedContact {
        let source_url = self.url();
        ExtractedContact {
            email,
            display_name: self.title,
            source_url,
            source_platform: Platform::YouTube,
            category: category.to_owned(),
            raw_snippet: self.description,
            subscriber_count: self.subscriber_count,
        }
    }
}

impl From<ChannelItem> for Channel {
    fn from(item: ChannelItem) -> Self {
        let subscriber_count = item
            .statistics
            .subscriber_count
            .as_deref()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(0);
        Self {
            id: item.id,
            title: item.snippet.title.trim().to_owned(),
            description: item.snippet.description,
            subscriber_count,
        }
    }
}

/// Client for the two YouTube endpoints the collector uses.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl YouTubeClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying client cannot be built.
    pub fn new(api_key: &str, settings: &HttpSettings) -> Result<Self, ScraperError> {
        Self::with_base_url(api_key, settings, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] or [`ScraperError::InvalidBaseUrl`].
    pub fn with_base_url(
        api_key: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        Ok(Self {
            client: settings.build_client()?,
            api_key: api_key.to_owned(),
            base_url: normalize_base_url(base_url)?,
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// Channel ids behind the top video results for `keyword`, first
    /// occurrence order, duplicates removed.
    ///
    /// Costs [`SEARCH_QUOTA_COST`] units.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] on transport failure, API error (for example
    /// `quotaExceeded`), or a malformed body.
    pub async fn search_channel_ids(
        &self,
        keyword: &str,
        region: Region,
        max_results: u32,
    ) -> Result<Vec<String>, ScraperError> {
        let url = format!("{}/search", self.base_url);
        let max_results = max_results.clamp(1, 50).to_string();
        let params = [
            ("part", "snippet"),
            ("type", "video"),
            ("q", keyword.trim()),
            ("maxResults", max_results.as_str()),
            ("regionCode", region.code()),
            ("key", self.api_key.as_str()),
        ];

        let (url, params) = (&url, &params);
        let response: ListResponse<SearchItem> =
            retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
                let response = self.client.get(url).query(params).send().await?;
                read_json(SERVICE, "search.list", response).await
            })
            .await?;

        let mut seen = HashSet::new();
        Ok(response
            .items
            .into_iter()
            .map(|item| item.snippet.channel_id)
            .filter(|id| seen.insert(id.clone()))
            .collect())
    }

    /// Fetches channel details, batching ids as the API allows.
    ///
    /// # Errors
    ///
    /// Returns a [`ScraperError`] if any batch fails.
    pub async fn channels(&self, ids: &[String]) -> Result<Vec<Channel>, ScraperError> {
        let url = format!("{}/channels", self.base_url);
        let mut channels = Vec::with_capacity(ids.len());

        for batch in ids.chunks(CHANNELS_PER_REQUEST) {
            let joined = batch.join(",");
            let params = [
                ("part", "snippet,statistics"),
                ("id", joined.as_str()),
                ("key", self.api_key.as_str()),
            ];
            let (url, params) = (&url, &params);
            let response: ListResponse<ChannelItem> =
                retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
                    let response = self.client.get(url).query(params).send().await?;
                    read_json(SERVICE, "channels.list", response).await
                })
                .await?;
            channels.extend(response.items.into_iter().map(Channel::from));
        }

        Ok(channels)
    }
}
