//! Snippet normalization: trim the raw search fields and classify whether the
//! result carries any target-script text.

use glowup_core::{contains_target_script, NormalizedResult, SearchResult};

/// Normalizes one raw [`SearchResult`].
///
/// No extraction or filtering happens here; fields pass through trimmed and
/// `has_local_script` records whether the title or snippet contains Hangul.
#[must_use]
pub fn normalize(result: SearchResult) -> NormalizedResult {
    let title = result.title.trim().to_owned();
    let snippet = result.snippet.trim().to_owned();
    let url = result.url.trim().to_owned();
    let has_local_script = contains_target_script(&title) || contains_target_script(&snippet);

    NormalizedResult {
        title,
        snippet,
        url,
        has_local_script,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
