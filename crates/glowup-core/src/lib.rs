//! Domain types, configuration, and the pure decision rules shared by the
//! collection pipeline, the record store, and the outreach sender.

pub mod app_config;
pub mod config;
pub mod contact;
pub mod merge;
pub mod platform;
pub mod quota;
pub mod script;
pub mod senders;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use contact::{email_local_part, normalize_email, ExtractedContact, NormalizedResult, SearchResult};
pub use merge::{plan_merge, MergeOutcome, MergePlan, StoredIdentity};
pub use platform::{CreatorStatus, Platform};
pub use quota::{Clock, FixedClock, QuotaCounters, QuotaPolicy, SystemClock};
pub use script::{contains_target_script, is_target_script_char};
pub use senders::{load_senders, SenderConfig, SendersFile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read senders file {path}: {source}")]
    SendersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse senders file: {0}")]
    SendersFileParse(#[source] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown creator status: {0}")]
    UnknownStatus(String),
}
