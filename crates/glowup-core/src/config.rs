use crate::app_config::{AppConfig, Environment};
use crate::quota::QuotaPolicy;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank values count as unset for optional secrets.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u16 = |var: &str, default: &str| -> Result<u16, ConfigError> {
        or_default(var, default)
            .parse::<u16>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_i32 = |var: &str, default: &str| -> Result<i32, ConfigError> {
        or_default(var, default)
            .parse::<i32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("GLOWUP_ENV", "development"))?;
    let log_level = or_default("GLOWUP_LOG_LEVEL", "info");
    let senders_path = PathBuf::from(or_default("GLOWUP_SENDERS_PATH", "./config/senders.yaml"));
    let assets_dir = PathBuf::from(or_default("GLOWUP_ASSETS_DIR", "./assets"));

    let apify_api_token = optional("APIFY_API_TOKEN");
    let apify_actor_id = or_default("GLOWUP_APIFY_ACTOR", "apify~google-search-scraper");
    let youtube_api_key = optional("YOUTUBE_API_KEY");
    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("GLOWUP_GEMINI_MODEL", "gemini-2.0-flash");

    let db_max_connections = parse_u32("GLOWUP_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("GLOWUP_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("GLOWUP_DB_ACQUIRE_TIMEOUT_SECS", "10")?;
    if db_min_connections > db_max_connections {
        return Err(ConfigError::Validation(format!(
            "GLOWUP_DB_MIN_CONNECTIONS ({db_min_connections}) exceeds GLOWUP_DB_MAX_CONNECTIONS ({db_max_connections})"
        )));
    }

    let scraper_request_timeout_secs = parse_u64("GLOWUP_SCRAPER_REQUEST_TIMEOUT_SECS", "120")?;
    let scraper_user_agent = or_default("GLOWUP_SCRAPER_USER_AGENT", "glowup/0.1 (creator-outreach)");
    let scraper_max_retries = parse_u32("GLOWUP_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_backoff_base_ms = parse_u64("GLOWUP_SCRAPER_RETRY_BACKOFF_BASE_MS", "1000")?;
    let blacklist_extra = parse_list(&or_default("GLOWUP_BLACKLIST_EXTRA", ""));

    let sender_email = optional("GLOWUP_SENDER_EMAIL");
    let sender_password = optional("GLOWUP_SENDER_PASSWORD");
    let smtp_host = or_default("GLOWUP_SMTP_HOST", "smtp.gmail.com");
    let smtp_port = parse_u16("GLOWUP_SMTP_PORT", "587")?;
    let send_delay_ms = parse_u64("GLOWUP_SEND_DELAY_MS", "1500")?;
    let creator_reply_to = or_default("GLOWUP_CREATOR_REPLY_TO", "hcommerceinc1@gmail.com");
    let brand_reply_to = or_default("GLOWUP_BRAND_REPLY_TO", "partner@glowuprizz.com");
    let creator_sender_name = or_default("GLOWUP_CREATOR_SENDER_NAME", "박혜란");
    let creator_card_path = PathBuf::from(or_default("GLOWUP_CREATOR_CARD_PATH", "cards/HR.png"));

    let quota_offset = parse_i32("GLOWUP_QUOTA_UTC_OFFSET_HOURS", "9")?;
    let quota_reset_hour = parse_u32("GLOWUP_QUOTA_RESET_HOUR", "17")?;
    let quota_policy = QuotaPolicy::new(quota_offset, quota_reset_hour).ok_or_else(|| {
        ConfigError::Validation(format!(
            "quota policy out of range: offset {quota_offset}h, reset hour {quota_reset_hour}"
        ))
    })?;
    let youtube_daily_quota = parse_u64("GLOWUP_YOUTUBE_DAILY_QUOTA", "500000")?;
    let youtube_daily_quota = i64::try_from(youtube_daily_quota)
        .map_err(|e| invalid("GLOWUP_YOUTUBE_DAILY_QUOTA", e.to_string()))?;

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        senders_path,
        assets_dir,
        apify_api_token,
        apify_actor_id,
        youtube_api_key,
        gemini_api_key,
        gemini_model,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
        blacklist_extra,
        sender_email,
        sender_password,
        smtp_host,
        smtp_port,
        send_delay_ms,
        creator_reply_to,
        brand_reply_to,
        creator_sender_name,
        creator_card_path,
        quota_policy,
        youtube_daily_quota,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything but the three known names.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "GLOWUP_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

/// Comma-separated list, trimmed, lower-cased, empties dropped.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
