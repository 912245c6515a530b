use std::path::PathBuf;

use crate::quota::QuotaPolicy;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub senders_path: PathBuf,
    pub assets_dir: PathBuf,

    pub apify_api_token: Option<String>,
    pub apify_actor_id: String,
    pub youtube_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_ms: u64,
    /// Operator additions to the built-in name/snippet blacklist, lower-cased.
    pub blacklist_extra: Vec<String>,

    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub send_delay_ms: u64,
    pub creator_reply_to: String,
    pub brand_reply_to: String,
    pub creator_sender_name: String,
    pub creator_card_path: PathBuf,

    pub quota_policy: QuotaPolicy,
    /// Daily search budget in API units.
    pub youtube_daily_quota: i64,
}

impl AppConfig {
    /// `true` when both halves of the SMTP login are present.
    #[must_use]
    pub fn has_smtp_credentials(&self) -> bool {
        self.sender_email.is_some() && self.sender_password.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");

        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("senders_path", &self.senders_path)
            .field("assets_dir", &self.assets_dir)
            .field("database_url", &"[redacted]")
            .field("apify_api_token", &redact(&self.apify_api_token))
            .field("apify_actor_id", &self.apify_actor_id)
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("gemini_model", &self.gemini_model)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("scraper_max_retries", &self.scraper_max_retries)
            .field(
                "scraper_retry_backoff_base_ms",
                &self.scraper_retry_backoff_base_ms,
            )
            .field("blacklist_extra", &self.blacklist_extra)
            .field("sender_email", &self.sender_email)
            .field("sender_password", &redact(&self.sender_password))
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("send_delay_ms", &self.send_delay_ms)
            .field("creator_reply_to", &self.creator_reply_to)
            .field("brand_reply_to", &self.brand_reply_to)
            .field("creator_sender_name", &self.creator_sender_name)
            .field("creator_card_path", &self.creator_card_path)
            .field("quota_policy", &self.quota_policy)
            .field("youtube_daily_quota", &self.youtube_daily_quota)
            .finish()
    }
}
