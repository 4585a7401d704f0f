//! Configuration for the birthday book.
//!
//! Settings come from an optional JSON file and can be overridden by
//! environment variables:
//! - `BIRTHDAY_BOOK_CONTACTS_FILE` - path of the contacts file
//! - `BIRTHDAY_BOOK_SEND_DELAY_MS` - pause between birthday messages
//! - `BIRTHDAY_BOOK_SEED` - `false` to start with an empty book instead of demo contacts

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::birthdays::{GreetingTemplate, DEFAULT_GREETING};

const APP_NAME: &str = "birthday-book";
const CONTACTS_FILE: &str = "contacts.db";

/// Default pause between two birthday messages.
pub const DEFAULT_SEND_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// The contacts file. Created on first load when missing.
    pub contacts_file: PathBuf,
    /// Fill a missing contacts file with demo contacts.
    pub seed_demo_contacts: bool,
    /// Pause between two birthday messages, in milliseconds.
    pub send_delay_ms: u64,
    /// Greeting text; `{name}` is replaced with the contact's name.
    pub greeting_template: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            contacts_file: default_contacts_file(),
            seed_demo_contacts: true,
            send_delay_ms: DEFAULT_SEND_DELAY_MS,
            greeting_template: DEFAULT_GREETING.to_string(),
        }
    }
}

impl BookConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Load configuration from `path`.
    /// Returns default config if the file doesn't exist or fails to parse.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn apply_env(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by variable name. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = lookup("BIRTHDAY_BOOK_CONTACTS_FILE") {
            self.contacts_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup("BIRTHDAY_BOOK_SEND_DELAY_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.send_delay_ms = ms,
                Err(_) => tracing::warn!("Ignoring BIRTHDAY_BOOK_SEND_DELAY_MS={:?}", raw),
            }
        }

        if let Some(raw) = lookup("BIRTHDAY_BOOK_SEED") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_demo_contacts = true,
                "0" | "false" | "no" => self.seed_demo_contacts = false,
                _ => tracing::warn!("Ignoring BIRTHDAY_BOOK_SEED={:?}", raw),
            }
        }

        self
    }

    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    pub fn greeting(&self) -> GreetingTemplate {
        GreetingTemplate::new(&self.greeting_template)
    }
}

/// `contacts.db` in the platform data directory, or the working directory
/// when there is none.
pub fn default_contacts_file() -> PathBuf {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().join(CONTACTS_FILE))
        .unwrap_or_else(|| PathBuf::from(CONTACTS_FILE))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BookConfig::default();
        assert!(config.seed_demo_contacts);
        assert_eq!(config.send_delay(), Duration::from_secs(2));
        assert!(config.contacts_file.ends_with("contacts.db"));
        assert_eq!(config.greeting_template, DEFAULT_GREETING);
    }

    #[test]
    fn test_overrides() {
        let config = BookConfig::default().apply_overrides(lookup(&[
            ("BIRTHDAY_BOOK_CONTACTS_FILE", "/tmp/book.db"),
            ("BIRTHDAY_BOOK_SEND_DELAY_MS", "250"),
            ("BIRTHDAY_BOOK_SEED", "false"),
        ]));

        assert_eq!(config.contacts_file, PathBuf::from("/tmp/book.db"));
        assert_eq!(config.send_delay_ms, 250);
        assert!(!config.seed_demo_contacts);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let config = BookConfig::default().apply_overrides(lookup(&[
            ("BIRTHDAY_BOOK_SEND_DELAY_MS", "soon"),
            ("BIRTHDAY_BOOK_SEED", "maybe"),
        ]));

        assert_eq!(config.send_delay_ms, DEFAULT_SEND_DELAY_MS);
        assert!(config.seed_demo_contacts);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = BookConfig {
            contacts_file: dir.path().join("contacts.db"),
            seed_demo_contacts: false,
            send_delay_ms: 0,
            greeting_template: "Hi {name}".to_string(),
        };

        config.save_to(&path).unwrap();

        assert_eq!(BookConfig::load_from(&path), config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "send_delay_ms": 10 }"#).unwrap();

        let config = BookConfig::try_load_from(&path).unwrap();
        assert_eq!(config.send_delay_ms, 10);
        assert!(config.seed_demo_contacts);
    }

    #[test]
    fn test_missing_or_broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert_eq!(BookConfig::load_from(&missing), BookConfig::default());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert!(BookConfig::try_load_from(&broken).is_err());
        assert_eq!(BookConfig::load_from(&broken), BookConfig::default());
    }
}
