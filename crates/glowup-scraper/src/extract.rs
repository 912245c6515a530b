//! Contact extraction from a single normalized search result.
//!
//! The email comes from the snippet only. The display name is produced by an
//! ordered list of [`NameStrategy`] values, first non-empty candidate wins,
//! followed by one cleanup pass. A name can always be synthesized from the
//! email, so extraction fails only when the snippet has no email.

use std::sync::LazyLock;

use glowup_core::{email_local_part, normalize_email, ExtractedContact, NormalizedResult, Platform};
use regex::Regex;
use reqwest::Url;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*@([A-Za-z0-9._]+)\s*\)").expect("valid regex"));

/// Sentence breaks and embedded emails that end a lead-in name.
static LEAD_IN_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}|[\n!?()\[\]]|\.\s")
        .expect("valid regex")
});

/// Follower/following/post counts that profile pages put before the name,
/// with the "See Instagram photos and videos from" tail of the English form.
static COUNT_BOILERPLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let item = r"(?:(?:팔로워|팔로잉|게시물)\s*[\d.,]+\s*[천만KkMm]?\s*[명개]?|[\d.,]+\s*[KkMm]?\s*(?:followers?|following|posts?))";
    Regex::new(&format!(
        r"(?i)^\s*{item}(?:\s*,\s*{item})*\s*(?:[-–—|•·]\s*)?(?:see\s+instagram\s+photos\s+and\s+videos\s+from\s*)?"
    ))
    .expect("valid regex")
});

/// Per platform: "<Platform>의 <name>님" and "<name>님의 <Platform>".
static POSSESSIVE_RES: LazyLock<Vec<(Platform, Regex, Regex)>> = LazyLock::new(|| {
    Platform::ALL
        .iter()
        .map(|&platform| {
            let names = platform.localized_names().join("|");
            let leading = Regex::new(&format!(
                r"(?i)(?:{names})\s*의\s*([^\s•|·()@]+?)\s*님"
            ))
            .expect("valid regex");
            let trailing = Regex::new(&format!(
                r"(?i)([^\s•|·()@]+?)\s*님의\s*(?:{names})"
            ))
            .expect("valid regex");
            (platform, leading, trailing)
        })
        .collect()
});

/// Lead-ins longer than this are prose, not a name; the handle is used instead.
const MAX_LEAD_IN_CHARS: usize = 40;

const SEPARATORS: &[&str] = &[" - ", " | ", " • ", " · ", " – ", " — "];

/// Trailing words that decorate profile-page titles.
const DECORATION_WORDS: &[&str] = &[
    "photos", "videos", "photo", "video", "profile", "posts", "post", "and", "&", "사진",
    "동영상", "영상", "프로필", "게시물", "및",
];

/// "See link for details" placeholders that are never a real name.
const PLACEHOLDERS: &[&str] = &["링크참고", "링크 참고", "링크참조", "프로필링크"];

const TRIM_CHARS: &[char] = &[
    '"', '\'', '“', '”', '‘', '’', '`', '.', ',', ':', ';', '!', '?', '~', '-', '_', '(', ')',
    '[', ']', '<', '>', '「', '」', '『', '』', '@', '|', '•', '·',
];

/// One named rule for finding a display-name candidate.
#[derive(Clone, Copy)]
pub struct NameStrategy {
    pub name: &'static str,
    pub run: fn(&NormalizedResult, Platform) -> Option<String>,
}

impl std::fmt::Debug for NameStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NameStrategy").field(&self.name).finish()
    }
}

/// Name strategies in priority order.
pub const NAME_STRATEGIES: &[NameStrategy] = &[
    NameStrategy {
        name: "snippet_handle",
        run: snippet_handle,
    },
    NameStrategy {
        name: "title_handle",
        run: title_handle,
    },
    NameStrategy {
        name: "possessive_phrase",
        run: possessive_phrase,
    },
    NameStrategy {
        name: "url_segment",
        run: url_segment,
    },
    NameStrategy {
        name: "email_local_part",
        run: email_local_part_strategy,
    },
];

/// First email-shaped substring of `text`, normalized.
#[must_use]
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| normalize_email(m.as_str()))
}

/// Extracts a contact from one result.
///
/// Returns `None` if and only if the snippet contains no email.
#[must_use]
pub fn extract(
    result: &NormalizedResult,
    platform: Platform,
    category: &str,
) -> Option<ExtractedContact> {
    let email = find_email(&result.snippet)?;

    let (strategy, candidate) = NAME_STRATEGIES
        .iter()
        .find_map(|s| {
            (s.run)(result, platform)
                .filter(|c| !c.trim().is_empty())
                .map(|c| (s.name, c))
        })
        .unwrap_or(("email_local_part", email_local_part(&email).to_owned()));

    let display_name = finalize_name(&candidate, platform, &email);
    tracing::debug!(
        %email,
        strategy,
        candidate = %candidate,
        display_name = %display_name,
        "extracted contact"
    );

    Some(ExtractedContact {
        email,
        display_name,
        source_url: result.url.clone(),
        source_platform: platform,
        category: category.to_owned(),
        raw_snippet: result.snippet.clone(),
        subscriber_count: 0,
    })
}

/// Cleans `candidate`, falling back to the email local part when the result is
/// empty or a placeholder.
#[must_use]
pub fn finalize_name(candidate: &str, platform: Platform, email: &str) -> String {
    let cleaned = clean_name(candidate, platform);
    if cleaned.is_empty() || PLACEHOLDERS.iter().any(|p| cleaned.contains(p)) {
        email_local_part(email).to_owned()
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn snippet_handle(result: &NormalizedResult, _platform: Platform) -> Option<String> {
    handle_pattern(&result.snippet)
}

fn title_handle(result: &NormalizedResult, _platform: Platform) -> Option<String> {
    handle_pattern(&result.title)
}

fn possessive_phrase(result: &NormalizedResult, platform: Platform) -> Option<String> {
    let (_, leading, trailing) = POSSESSIVE_RES.iter().find(|(p, _, _)| *p == platform)?;
    [&result.title, &result.snippet].into_iter().find_map(|text| {
        leading
            .captures(text)
            .or_else(|| trailing.captures(text))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
    })
}

fn url_segment(result: &NormalizedResult, platform: Platform) -> Option<String> {
    let url = Url::parse(&result.url).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let domain = platform.domain();
    if host != domain && !host.ends_with(&format!(".{domain}")) {
        return None;
    }

    let first = url.path_segments()?.find(|s| !s.is_empty())?;
    let reserved = platform
        .reserved_segments()
        .iter()
        .any(|r| r.eq_ignore_ascii_case(first));
    if reserved {
        return None;
    }

    let handle = first.trim_start_matches('@');
    (!handle.is_empty()).then(|| handle.to_owned())
}

fn email_local_part_strategy(result: &NormalizedResult, _platform: Platform) -> Option<String> {
    find_email(&result.snippet).map(|e| email_local_part(&e).to_owned())
}

/// `<name> (@handle)`: the readable name before the parenthesized handle,
/// else the handle itself.
fn handle_pattern(text: &str) -> Option<String> {
    let caps = HANDLE_RE.captures(text)?;
    let whole = caps.get(0)?;
    let handle = caps.get(1)?.as_str();

    let before = &text[..whole.start()];
    let lead_in = LEAD_IN_BREAK_RE
        .split(before)
        .last()
        .unwrap_or_default()
        .trim();
    let lead_in = strip_count_boilerplate(lead_in)
        .trim_matches(TRIM_CHARS)
        .trim();

    if lead_in.is_empty() || lead_in.chars().count() > MAX_LEAD_IN_CHARS {
        Some(handle.to_owned())
    } else {
        Some(lead_in.to_owned())
    }
}

/// Drops a leading run of profile counts. A lead-in made only of counts
/// becomes empty.
fn strip_count_boilerplate(text: &str) -> &str {
    COUNT_BOILERPLATE_RE
        .find(text)
        .map_or(text, |m| &text[m.end()..])
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

/// Strips platform prefixes, decorative suffixes and honorifics.
#[must_use]
pub fn clean_name(raw: &str, platform: Platform) -> String {
    let mut name = strip_platform_prefix(raw.trim(), platform);

    if let Some(cut) = SEPARATORS.iter().filter_map(|sep| name.find(sep)).min() {
        name = &name[..cut];
    }

    loop {
        let before = name;
        name = name.trim().trim_matches(TRIM_CHARS).trim();
        for word in platform.localized_names().iter().chain(DECORATION_WORDS) {
            name = strip_suffix_word(name, word);
        }
        name = name.strip_suffix("님의").unwrap_or(name);
        name = name.strip_suffix('님').unwrap_or(name);
        if name == before {
            break;
        }
    }

    name.to_owned()
}

/// Removes a leading "<Platform>의" or "<Platform>'s".
fn strip_platform_prefix(name: &str, platform: Platform) -> &str {
    for localized in platform.localized_names() {
        let Some(rest) = strip_prefix_ignore_ascii_case(name, localized) else {
            continue;
        };
        let rest = rest.trim_start();
        for marker in ["의", "'s", "’s"] {
            if let Some(after) = rest.strip_prefix(marker) {
                return after.trim_start();
            }
        }
    }
    name
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

/// Removes a trailing `word` (ASCII case-insensitive). ASCII words must sit on
/// a word boundary so names like "Rand" keep their tail.
fn strip_suffix_word<'a>(s: &'a str, word: &str) -> &'a str {
    let Some(cut) = s.len().checked_sub(word.len()) else {
        return s;
    };
    let Some(tail) = s.get(cut..) else {
        return s;
    };
    if !tail.eq_ignore_ascii_case(word) {
        return s;
    }

    let head = &s[..cut];
    let on_boundary = head.is_empty()
        || !word.is_ascii()
        || head
            .chars()
            .next_back()
            .is_some_and(|c| c.is_whitespace() || TRIM_CHARS.contains(&c));
    if on_boundary {
        head.trim_end()
    } else {
        s
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
