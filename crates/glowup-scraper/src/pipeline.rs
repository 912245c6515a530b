//! Result-to-contact pipeline: normalize, filter, extract, re-check the name.
//!
//! Drops are silent apart from debug logs; callers only see the counts.

use glowup_core::{ExtractedContact, Platform, SearchResult};

use crate::extract::extract;
use crate::filter::RelevanceFilter;
use crate::normalize::normalize;

/// Contacts recovered from one batch of search results.
#[derive(Debug, Default)]
pub struct Harvest {
    pub contacts: Vec<ExtractedContact>,
    /// Results rejected by the relevance rules (including the name check).
    pub filtered: usize,
    /// Relevant results whose snippet held no email.
    pub no_email: usize,
}

impl Harvest {
    #[must_use]
    pub fn examined(&self) -> usize {
        self.contacts.len() + self.filtered + self.no_email
    }
}

/// Runs every result through the pipeline, preserving input order.
#[must_use]
pub fn harvest(
    results: Vec<SearchResult>,
    platform: Platform,
    category: &str,
    filter: &RelevanceFilter,
) -> Harvest {
    let mut out = Harvest::default();

    for raw in results {
        let result = normalize(raw);

        if let Err(reason) = filter.check(&result, platform) {
            tracing::debug!(url = %result.url, %reason, "result filtered out");
            out.filtered += 1;
            continue;
        }

        let Some(contact) = extract(&result, platform, category) else {
            tracing::debug!(url = %result.url, "no email in snippet");
            out.no_email += 1;
            continue;
        };

        if let Err(reason) = filter.check_name(&contact.display_name) {
            tracing::debug!(
                email = %contact.email,
                name = %contact.display_name,
                %reason,
                "extracted name filtered out"
            );
            out.filtered += 1;
            continue;
        }

        out.contacts.push(contact);
    }

    tracing::info!(
        platform = platform.as_str(),
        category,
        contacts = out.contacts.len(),
        filtered = out.filtered,
        no_email = out.no_email,
        "harvested search results"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Blacklist;

    fn raw(title: &str, snippet: &str, url: &str) -> SearchResult {
        SearchResult {
            title: title.to_owned(),
            snippet: snippet.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn keeps_creators_and_counts_drops() {
        let results = vec![
            raw(
                "제이미 (@jamie.beauty) • Instagram",
                "제이미 - 뷰티 크리에이터 (@jamie.beauty) 협찬 문의 jamie.b@gmail.com",
                "https://www.instagram.com/jamie.beauty/",
            ),
            raw(
                "OO피부과 공식 (@oo.clinic)",
                "예약 문의 clinic@oo.co.kr",
                "https://www.instagram.com/oo.clinic/",
            ),
            raw(
                "Jamie",
                "beauty tips jamie@gmail.com",
                "https://www.instagram.com/jamie/",
            ),
            raw(
                "제이미 (@jamie.beauty)",
                "매일 메이크업 올려요 DM 주세요",
                "https://www.instagram.com/jamie.beauty/",
            ),
        ];

        let harvest = harvest(results, Platform::Instagram, "뷰티", &RelevanceFilter::default());
        assert_eq!(harvest.contacts.len(), 1);
        assert_eq!(harvest.contacts[0].display_name, "제이미");
        assert_eq!(harvest.filtered, 2);
        assert_eq!(harvest.no_email, 1);
        assert_eq!(harvest.examined(), 4);
    }

    #[test]
    fn name_blacklist_applies_after_extraction() {
        let filter = RelevanceFilter::new(Blacklist::with_extra(&["glowmall".to_owned()]));
        let results = vec![raw(
            "",
            "뷰티 일상 문의 hi@glow.kr",
            "https://www.tiktok.com/@glowmall_kr",
        )];
        let harvest = harvest(results, Platform::TikTok, "뷰티", &filter);
        assert!(harvest.contacts.is_empty());
        assert_eq!(harvest.filtered, 1);
    }
}
