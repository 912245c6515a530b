//! Storefront lead discovery: seller ids on Naver Smart Store pages map to
//! the seller's `@naver.com` address.

use std::collections::HashSet;
use std::sync::LazyLock;

use glowup_core::{normalize_email, SearchResult};
use regex::Regex;

static STORE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"smartstore\.naver\.com/([A-Za-z0-9_-]+)").expect("valid regex")
});

/// Path segments on the storefront domain that are not seller ids.
const RESERVED_IDS: &[&str] = &["main", "category", "search", "inflow", "products"];

/// A storefront seller found in search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLead {
    pub store_id: String,
    pub email: String,
}

/// `site:` query for storefronts selling `keyword`.
#[must_use]
pub fn storefront_query(keyword: &str) -> String {
    format!("site:smartstore.naver.com {}", keyword.trim())
}

/// Seller id in a storefront URL.
#[must_use]
pub fn store_id(url: &str) -> Option<&str> {
    let id = STORE_ID_RE.captures(url)?.get(1)?.as_str();
    let reserved = RESERVED_IDS.iter().any(|r| r.eq_ignore_ascii_case(id));
    (!reserved).then_some(id)
}

/// The seller's naver mailbox.
#[must_use]
pub fn lead_email(store_id: &str) -> String {
    normalize_email(&format!("{store_id}@naver.com"))
}

/// Leads in result order, one per email.
#[must_use]
pub fn discover_leads(results: &[SearchResult]) -> Vec<StoreLead> {
    let mut seen = HashSet::new();
    let mut leads = Vec::new();
    for result in results {
        let Some(id) = store_id(&result.url) else {
            continue;
        };
        let email = lead_email(id);
        if seen.insert(email.clone()) {
            leads.push(StoreLead {
                store_id: id.to_owned(),
                email,
            });
        }
    }
    leads
}
