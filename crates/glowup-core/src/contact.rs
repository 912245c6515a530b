use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// One organic result returned by the web-search collaborator.
///
/// The search scraper calls the snippet `description`; both spellings are
/// accepted. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "description")]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
}

/// A [`SearchResult`] after normalization, carrying the script signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    /// `true` iff the title or snippet contains a target-script character.
    pub has_local_script: bool,
}

/// A lead recovered from a single result (or channel), ready for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedContact {
    /// Lower-cased, trimmed email. Sole identity key in the record store.
    pub email: String,
    pub display_name: String,
    pub source_url: String,
    pub source_platform: Platform,
    pub category: String,
    /// The snippet (or channel description) the contact came from; stored as
    /// the record description.
    pub raw_snippet: String,
    /// Zero when the source does not expose an audience size.
    pub subscriber_count: i64,
}

impl ExtractedContact {
    /// Text before the `@` of the email.
    #[must_use]
    pub fn email_local_part(&self) -> &str {
        email_local_part(&self.email)
    }
}

/// Canonical form of an email used as the identity key.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Text before the first `@`, or the whole string if there is none.
#[must_use]
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
