//! Relevance filter: precision rules that drop institutional, commercial and
//! non-profile search results before extraction.
//!
//! Rules run in order and short-circuit on the first failure:
//! 1. no target-script text in title or snippet,
//! 2. URL outside the platform's domain or shaped like a content page,
//! 3. a blacklist term in the snippet or title.
//!
//! The extracted candidate name is checked against the same blacklist with
//! [`RelevanceFilter::check_name`] once extraction has produced it.

use glowup_core::{NormalizedResult, Platform};
use reqwest::Url;
use thiserror::Error;

/// Institutional and commercial markers, lower-cased. Matched as substrings.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    // English
    "official",
    "shop",
    "store",
    "brand",
    "company",
    "clinic",
    "studio",
    "museum",
    "academy",
    "government",
    "foundation",
    "association",
    "center",
    "centre",
    "reservation",
    "national",
    "customer service",
    "inquiry",
    "corporation",
    "corp.",
    "wholesale",
    // Korean
    "공식",
    "쇼핑몰",
    "스토어",
    "주식회사",
    "(주)",
    "법인",
    "클리닉",
    "피부과",
    "스튜디오",
    "박물관",
    "미술관",
    "아카데미",
    "학원",
    "정부",
    "공공기관",
    "재단",
    "협회",
    "센터",
    "예약",
    "국립",
    "고객센터",
    "고객문의",
    "구매문의",
    "도매",
];

/// Why a result was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no target-script text in title or snippet")]
    NoTargetScript,

    #[error("URL is not on {0}")]
    OffPlatform(&'static str),

    #[error("URL is a non-profile page ({0})")]
    NonProfileUrl(&'static str),

    #[error("blacklisted term \"{0}\"")]
    Blacklisted(String),
}

/// Case-insensitive substring blacklist.
#[derive(Debug, Clone)]
pub struct Blacklist {
    terms: Vec<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self {
            terms: DEFAULT_BLACKLIST.iter().map(|t| (*t).to_owned()).collect(),
        }
    }
}

impl Blacklist {
    /// The default terms plus operator additions. Blank and duplicate terms
    /// are ignored.
    #[must_use]
    pub fn with_extra(extra: &[String]) -> Self {
        let mut list = Self::default();
        for term in extra {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !list.terms.contains(&term) {
                list.terms.push(term);
            }
        }
        list
    }

    /// The first term contained in `text`, if any.
    #[must_use]
    pub fn find(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.terms
            .iter()
            .find(|term| lowered.contains(term.as_str()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Path fragments that mark a content page rather than a profile.
fn non_profile_markers(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::Instagram => &["/tags/", "/explore", "/p/", "/reel/", "/reels/", "/tv/"],
        Platform::TikTok => &["/tag/"],
        Platform::YouTube => &[],
    }
}

/// `true` if `url` parses and its host is the platform domain or a subdomain of it.
fn is_on_platform(url: &str, platform: Platform) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = platform.domain();
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[derive(Debug, Clone, Default)]
pub struct RelevanceFilter {
    blacklist: Blacklist,
}

impl RelevanceFilter {
    #[must_use]
    pub fn new(blacklist: Blacklist) -> Self {
        Self { blacklist }
    }

    /// Applies rules 1 to 3 in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`Rejection`] that applies.
    pub fn check(&self, result: &NormalizedResult, platform: Platform) -> Result<(), Rejection> {
        if !result.has_local_script {
            return Err(Rejection::NoTargetScript);
        }

        if !is_on_platform(&result.url, platform) {
            return Err(Rejection::OffPlatform(platform.domain()));
        }

        let url = result.url.to_lowercase();
        if let Some(marker) = non_profile_markers(platform)
            .iter()
            .find(|m| url.contains(*m))
        {
            return Err(Rejection::NonProfileUrl(*marker));
        }

        for text in [&result.snippet, &result.title] {
            if let Some(term) = self.blacklist.find(text) {
                return Err(Rejection::Blacklisted(term.to_owned()));
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_relevant(&self, result: &NormalizedResult, platform: Platform) -> bool {
        self.check(result, platform).is_ok()
    }

    /// Rule 3 applied to an extracted display name.
    ///
    /// # Errors
    ///
    /// Returns [`Rejection::Blacklisted`] if the name contains a blacklist term.
    pub fn check_name(&self, name: &str) -> Result<(), Rejection> {
        match self.blacklist.find(name) {
            Some(term) => Err(Rejection::Blacklisted(term.to_owned())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
