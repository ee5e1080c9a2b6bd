//! Board configuration, loaded from the environment (and an optional `.env`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use campusboard_core::DomainError;
use campusboard_forum::TopicFilter;

pub const PROTECTED_ACCOUNTS_ENV: &str = "CAMPUSBOARD_PROTECTED_ACCOUNTS";
pub const SEED_POSTS_ENV: &str = "CAMPUSBOARD_SEED_POSTS";
pub const DEFAULT_TOPIC_ENV: &str = "CAMPUSBOARD_DEFAULT_TOPIC";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key}: expected 'true' or 'false', got '{value}'")]
    InvalidBool { key: &'static str, value: String },

    #[error("{key}: {source}")]
    InvalidTopic {
        key: &'static str,
        #[source]
        source: DomainError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Accounts the user-management view refuses to toggle.
    pub protected_accounts: Vec<String>,
    /// Start with the two reference posts instead of an empty board.
    pub seed_posts: bool,
    /// Topic filter selected when the board starts.
    pub default_filter: TopicFilter,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            protected_accounts: vec!["admin".to_string()],
            seed_posts: true,
            default_filter: TopicFilter::All,
        }
    }
}

impl BoardConfig {
    /// Load from process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(PROTECTED_ACCOUNTS_ENV) {
            config.protected_accounts = raw
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(raw) = lookup(SEED_POSTS_ENV) {
            config.seed_posts = match raw.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        key: SEED_POSTS_ENV,
                        value: raw,
                    });
                }
            };
        }

        if let Some(raw) = lookup(DEFAULT_TOPIC_ENV) {
            config.default_filter =
                raw.trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidTopic {
                        key: DEFAULT_TOPIC_ENV,
                        source,
                    })?;
        }

        Ok(config)
    }

    pub fn is_protected(&self, username: &str) -> bool {
        self.protected_accounts.iter().any(|name| name == username)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use campusboard_forum::Topic;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = BoardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert!(config.is_protected("admin"));
        assert!(!config.is_protected("moderator"));
        assert!(config.seed_posts);
    }

    #[test]
    fn reads_every_key() {
        let config = BoardConfig::from_lookup(lookup(&[
            (PROTECTED_ACCOUNTS_ENV, "admin, moderator,,"),
            (SEED_POSTS_ENV, "false"),
            (DEFAULT_TOPIC_ENV, "Career Services"),
        ]))
        .unwrap();

        assert_eq!(config.protected_accounts, vec!["admin", "moderator"]);
        assert!(!config.seed_posts);
        assert_eq!(
            config.default_filter,
            TopicFilter::Only(Topic::CareerServices)
        );
    }

    #[test]
    fn empty_protected_list_protects_nobody() {
        let config = BoardConfig::from_lookup(lookup(&[(PROTECTED_ACCOUNTS_ENV, "")])).unwrap();
        assert!(!config.is_protected("admin"));
    }

    #[test]
    fn rejects_bad_values() {
        let err = BoardConfig::from_lookup(lookup(&[(SEED_POSTS_ENV, "yes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { .. }));

        let err =
            BoardConfig::from_lookup(lookup(&[(DEFAULT_TOPIC_ENV, "Gardening")])).unwrap_err();
        assert!(err.to_string().starts_with(DEFAULT_TOPIC_ENV));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"seed_posts": false}"#).unwrap();
        assert!(!config.seed_posts);
        assert_eq!(config.protected_accounts, vec!["admin"]);
    }
}
