// SPDX-License-Identifier: MPL-2.0
//! User preferences, loaded from and saved to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Language and theme mode
//! - `[storage]` - Slot capacity ceiling
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set `CLIPSHELF_CONFIG_DIR` environment variable
//! 3. Falls back to the platform-specific config directory

pub mod defaults;

pub use defaults::DEFAULT_MAX_SLOT_MIB;

use crate::app::paths;
use crate::error::{Error, Result};
use crate::ui::theming::ThemeMode;
use defaults::{default_max_slot_mib, default_theme_mode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Application theme mode (light, dark, or system).
    #[serde(default = "default_theme_mode")]
    pub theme_mode: ThemeMode,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            theme_mode: default_theme_mode(),
        }
    }
}

/// Storage slot settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StorageConfig {
    /// Slot capacity ceiling in MiB. Mutations that would grow the slot past
    /// this are rejected.
    #[serde(default = "default_max_slot_mib")]
    pub max_slot_mib: Option<u32>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_slot_mib: default_max_slot_mib(),
        }
    }
}

/// Root configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Effective slot ceiling in bytes.
    #[must_use]
    pub fn max_slot_bytes(&self) -> usize {
        let mib = self.storage.max_slot_mib.unwrap_or(DEFAULT_MAX_SLOT_MIB);
        mib as usize * 1024 * 1024
    }
}

/// Loads configuration from the default location.
///
/// A missing file yields defaults silently; an unreadable or unparsable file
/// yields defaults plus a warning key for the toast layer.
pub fn load() -> (Config, Option<String>) {
    let Some(path) = config_file_path() else {
        return (Config::default(), None);
    };

    if !path.exists() {
        return (Config::default(), None);
    }

    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(_) => (
            Config::default(),
            Some("notification-config-parse-error".to_string()),
        ),
    }
}

/// Loads configuration from an explicit file path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Saves configuration to the default location, creating the directory if
/// needed.
pub fn save(config: &Config) -> Result<()> {
    let path = config_file_path()
        .ok_or_else(|| Error::Config("config directory could not be resolved".to_string()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    save_to_path(config, &path)
}

/// Saves configuration to an explicit file path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

fn config_file_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.general.theme_mode, ThemeMode::System);
        assert_eq!(config.storage.max_slot_mib, Some(DEFAULT_MAX_SLOT_MIB));
        assert_eq!(config.max_slot_bytes(), 10 * 1024 * 1024);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);

        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
                theme_mode: ThemeMode::Dark,
            },
            storage: StorageConfig {
                max_slot_mib: Some(4),
            },
        };

        save_to_path(&config, &path).expect("save");
        let loaded = load_from_path(&path).expect("load");
        assert_eq!(config, loaded);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[general]\nlanguage = \"en-US\"\n").expect("write");

        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded.general.language.as_deref(), Some("en-US"));
        assert_eq!(loaded.storage.max_slot_mib, Some(DEFAULT_MAX_SLOT_MIB));
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "][ not toml").expect("write");

        assert!(load_from_path(&path).is_err());
    }

    #[test]
    fn custom_ceiling_converts_to_bytes() {
        let config = Config {
            storage: StorageConfig {
                max_slot_mib: Some(4),
            },
            ..Config::default()
        };
        assert_eq!(config.max_slot_bytes(), 4 * 1024 * 1024);
    }
}
