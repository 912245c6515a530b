use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A person who signs partnership mail, with their business-card image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderConfig {
    /// Short selector used on the command line, e.g. `hs`.
    pub key: String,
    /// Name printed in the mail signature.
    pub name: String,
    /// Card image, relative to the assets directory.
    pub card_path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SendersFile {
    pub senders: Vec<SenderConfig>,
}

impl SendersFile {
    /// Case-insensitive lookup by key.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&SenderConfig> {
        let key = key.trim();
        self.senders
            .iter()
            .find(|s| s.key.eq_ignore_ascii_case(key))
    }
}

/// Load and validate the senders configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_senders(path: &Path) -> Result<SendersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SendersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_senders(&content)
}

fn parse_senders(content: &str) -> Result<SendersFile, ConfigError> {
    let senders_file: SendersFile =
        serde_yaml::from_str(content).map_err(ConfigError::SendersFileParse)?;

    validate_senders(&senders_file)?;

    Ok(senders_file)
}

fn validate_senders(senders_file: &SendersFile) -> Result<(), ConfigError> {
    if senders_file.senders.is_empty() {
        return Err(ConfigError::Validation(
            "senders file must list at least one sender".to_string(),
        ));
    }

    let mut seen_keys = HashSet::new();
    let mut seen_names = HashSet::new();

    for sender in &senders_file.senders {
        if sender.key.trim().is_empty() || sender.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sender key and name must be non-empty".to_string(),
            ));
        }

        if sender.card_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "sender '{}' has an empty card_path",
                sender.name
            )));
        }

        if !seen_keys.insert(sender.key.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate sender key: '{}'",
                sender.key
            )));
        }

        if !seen_names.insert(sender.name.trim().to_string()) {
            return Err(ConfigError::Validation(format!(
                "duplicate sender name: '{}'",
                sender.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "senders_test.rs"]
mod tests;
