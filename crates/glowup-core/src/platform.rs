use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Social platform a creator was discovered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::YouTube, Platform::Instagram, Platform::TikTok];

    /// Canonical name, also the value persisted in `creators.platform`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
        }
    }

    /// Registrable domain used both for `site:` queries and URL matching.
    #[must_use]
    pub fn domain(self) -> &'static str {
        match self {
            Platform::YouTube => "youtube.com",
            Platform::Instagram => "instagram.com",
            Platform::TikTok => "tiktok.com",
        }
    }

    /// Every spelling of the platform name that shows up in result titles,
    /// lower-cased.
    #[must_use]
    pub fn localized_names(self) -> &'static [&'static str] {
        match self {
            Platform::YouTube => &["youtube", "유튜브"],
            Platform::Instagram => &["instagram", "인스타그램", "인스타"],
            Platform::TikTok => &["tiktok", "틱톡"],
        }
    }

    /// Path segments that name a content route rather than a profile handle.
    #[must_use]
    pub fn reserved_segments(self) -> &'static [&'static str] {
        match self {
            Platform::YouTube => &[
                "channel", "c", "user", "watch", "shorts", "results", "playlist", "feed", "post",
            ],
            Platform::Instagram => &[
                "p", "post", "reel", "reels", "tv", "tags", "tag", "explore", "stories",
                "accounts", "direct",
            ],
            Platform::TikTok => &["video", "tag", "discover", "music", "search", "explore"],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youtube" | "yt" => Ok(Platform::YouTube),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "tiktok" | "tk" => Ok(Platform::TikTok),
            other => Err(CoreError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Outreach lifecycle of a creator record. Moves `Pending -> Sent` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorStatus {
    Pending,
    Sent,
}

impl CreatorStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CreatorStatus::Pending => "pending",
            CreatorStatus::Sent => "sent",
        }
    }
}

impl std::fmt::Display for CreatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CreatorStatus::Pending),
            "sent" => Ok(CreatorStatus::Sent),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_round_trips_through_display() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn platform_parse_accepts_short_aliases() {
        assert_eq!("ig".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("TK".parse::<Platform>().unwrap(), Platform::TikTok);
    }

    #[test]
    fn platform_parse_rejects_unknown() {
        let err = "myspace".parse::<Platform>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownPlatform(ref p) if p == "myspace"));
    }

    #[test]
    fn status_parse_is_exact() {
        assert_eq!("sent".parse::<CreatorStatus>().unwrap(), CreatorStatus::Sent);
        assert!("대기".parse::<CreatorStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&CreatorStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
