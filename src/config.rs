//! User configuration (`config.toml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::calculator::DisplayOptions;
use crate::history::DEFAULT_MAX_ENTRIES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplaySection,
    pub input: InputSection,
    pub history: HistorySection,
}

/// The `[display]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub thousands_separator: bool,
}

/// The `[input]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputSection {
    pub auto_close_parentheses: bool,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            auto_close_parentheses: true,
        }
    }
}

/// The `[history]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistorySection {
    pub enabled: bool,
    pub max_entries: usize,
    /// Overrides the default location under the user's data directory.
    pub path: Option<PathBuf>,
}

impl Default for HistorySection {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: DEFAULT_MAX_ENTRIES,
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_owned(),
            source: e,
        })?;

        Self::from_str(&content, path)
    }

    /// Parse configuration from a string.
    pub fn from_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            thousands_separator: self.display.thousands_separator,
            auto_close_parentheses: self.input.auto_close_parentheses,
        }
    }

    /// Resolved history file path, if any location is available.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history
            .path
            .clone()
            .or_else(crate::history::default_history_path)
    }
}

/// Get the default config file path.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("infixcalc").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_path() -> PathBuf {
        PathBuf::from("test/config.toml")
    }

    #[test]
    fn parse_empty_config() {
        let config = Config::from_str("", &test_path()).unwrap();
        assert!(!config.display.thousands_separator);
        assert!(config.input.auto_close_parentheses);
        assert!(config.history.enabled);
        assert_eq!(config.history.max_entries, DEFAULT_MAX_ENTRIES);
        assert!(config.history.path.is_none());
    }

    #[test]
    fn parse_full_config() {
        let content = r#"
            [display]
            thousands_separator = true

            [input]
            auto_close_parentheses = false

            [history]
            enabled = false
            max_entries = 10
            path = "/tmp/calc-history.json"
        "#;

        let config = Config::from_str(content, &test_path()).unwrap();
        let options = config.display_options();
        assert!(options.thousands_separator);
        assert!(!options.auto_close_parentheses);
        assert!(!config.history.enabled);
        assert_eq!(config.history.max_entries, 10);
        assert_eq!(
            config.history_path(),
            Some(PathBuf::from("/tmp/calc-history.json"))
        );
    }

    #[test]
    fn partial_section_keeps_defaults() {
        let content = r#"
            [history]
            max_entries = 5
        "#;

        let config = Config::from_str(content, &test_path()).unwrap();
        assert!(config.history.enabled);
        assert_eq!(config.history.max_entries, 5);
    }

    #[test]
    fn invalid_toml_fails() {
        let result = Config::from_str("this is not valid toml [[[", &test_path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn wrong_type_fails() {
        let content = r#"
            [display]
            thousands_separator = "yes"
        "#;
        let result = Config::from_str(content, &test_path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("config.toml")).unwrap();
        assert!(config.history.enabled);
    }
}
