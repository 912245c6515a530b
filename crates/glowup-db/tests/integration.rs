//! Offline unit tests for glowup-db pool configuration and row types.
//! These tests do not require a live database connection.

use glowup_core::{AppConfig, CreatorStatus, Environment, Platform, QuotaPolicy};
use glowup_db::{BrandLeadRow, CreatorFilter, CreatorRow, PoolConfig};
use std::path::PathBuf;

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        senders_path: PathBuf::from("./config/senders.yaml"),
        assets_dir: PathBuf::from("./assets"),
        apify_api_token: None,
        apify_actor_id: "apify~google-search-scraper".to_string(),
        youtube_api_key: None,
        gemini_api_key: None,
        gemini_model: "gemini-2.0-flash".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        scraper_request_timeout_secs: 30,
        scraper_user_agent: "ua".to_string(),
        scraper_max_retries: 3,
        scraper_retry_backoff_base_ms: 1000,
        blacklist_extra: vec![],
        sender_email: None,
        sender_password: None,
        smtp_host: "smtp.gmail.com".to_string(),
        smtp_port: 587,
        send_delay_ms: 1500,
        creator_reply_to: "reply@example.com".to_string(),
        brand_reply_to: "partner@example.com".to_string(),
        creator_sender_name: "sender".to_string(),
        creator_card_path: PathBuf::from("cards/HR.png"),
        quota_policy: QuotaPolicy::default(),
        youtube_daily_quota: 500_000,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`CreatorRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn creator_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = CreatorRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        platform: Platform::Instagram.as_str().to_string(),
        category: "뷰티".to_string(),
        display_name: "제이미".to_string(),
        email: "jamie@naver.com".to_string(),
        profile_url: "https://instagram.com/jamie/".to_string(),
        subscriber_count: 0_i64,
        description: "협찬 문의 jamie@naver.com".to_string(),
        collected_at: Utc::now(),
        status: CreatorStatus::Pending.as_str().to_string(),
    };

    assert_eq!(row.platform, "Instagram");
    assert!(row.is_pending());

    let sent = CreatorRow {
        status: "sent".to_string(),
        ..row
    };
    assert!(!sent.is_pending());
}

#[test]
fn brand_lead_row_starts_unsent() {
    use chrono::Utc;

    let row = BrandLeadRow {
        id: 1,
        email: "glowmall@naver.com".to_string(),
        keyword: "비타민".to_string(),
        discovered_at: Utc::now(),
        last_sent_at: None,
        send_count: 0_i32,
        template_used: None,
    };
    assert_eq!(row.send_count, 0);
    assert!(row.last_sent_at.is_none());
    assert!(row.template_used.is_none());
}

#[test]
fn default_creator_filter_matches_everything() {
    let filter = CreatorFilter::default();
    assert!(filter.platform.is_none());
    assert!(filter.status.is_none());
}
