//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the last identifier used on the login form, the chat reply delay, an
//! optional session lifetime and an optional storage directory override.
//!
//! Configuration is stored at `~/.config/lumi/config.json`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Application name used for config/data directory paths
const APP_NAME: &str = "lumi";

/// Config file name
const CONFIG_FILE: &str = "config.json";

fn default_reply_delay_ms() -> u64 {
    600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub last_identifier: Option<String>,
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Sessions older than this are ignored by the guards. `None`, 0 or a
    /// negative value means sessions never expire.
    #[serde(default)]
    pub session_ttl_hours: Option<i64>,
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            last_identifier: None,
            reply_delay_ms: default_reply_delay_ms(),
            session_ttl_hours: None,
            storage_dir: None,
        }
    }
}

impl Config {
    /// Load the user's configuration. A missing file gives the defaults; an
    /// unreadable one is logged and also gives the defaults.
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!(error = %e, "No config directory, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(config) => {
                debug!(path = %path.display(), "Config loaded");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("No config directory on this platform")?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding `storage.json` and log files
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.storage_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().context("No data directory on this platform")?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reply_delay(), Duration::from_millis(600));
        assert!(config.session_ttl_hours.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"last_identifier":"ee@escola.pt"}"#).unwrap();
        assert_eq!(config.last_identifier.as_deref(), Some("ee@escola.pt"));
        assert_eq!(config.reply_delay_ms, 600);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config.reply_delay_ms, 600);
        assert!(config.last_identifier.is_none());
    }

    #[test]
    fn test_load_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ reply_delay_ms: ").unwrap();
        let config = Config::load_from(&path);
        assert_eq!(config.reply_delay_ms, 600);
        assert!(config.session_ttl_hours.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lumi").join("config.json");
        let config = Config {
            last_identifier: Some("professor@escola.pt".to_string()),
            reply_delay_ms: 50,
            session_ttl_hours: Some(8),
            storage_dir: None,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.last_identifier.as_deref(), Some("professor@escola.pt"));
        assert_eq!(loaded.reply_delay(), Duration::from_millis(50));
        assert_eq!(loaded.session_ttl_hours, Some(8));
    }

    #[test]
    fn test_storage_dir_override() {
        let config = Config {
            storage_dir: Some(PathBuf::from("/tmp/lumi-test")),
            ..Config::default()
        };
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/lumi-test"));
    }
}
