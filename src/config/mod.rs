//! Configuration system for recordpath.
//!
//! This module provides the configuration structure for recordpath with
//! defaults and TOML (de)serialization via serde. Settings given on the
//! command line take precedence over the file.
//!
//! # Example
//!
//! ```
//! use recordpath::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.log_level, "warn");
//! assert!(!config.pretty);
//! assert!(config.rules.is_empty());
//!
//! let parsed: Config = toml::from_str(r#"
//!     pretty = true
//!
//!     [[rules]]
//!     path = "$.user.email"
//!     value = "redacted"
//! "#).unwrap();
//! assert!(parsed.pretty);
//! assert_eq!(parsed.rules[0].path, "$.user.email");
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for the recordpath binary.
///
/// # Fields
///
/// * `log_level` - Filter directive used when `RUST_LOG` is unset (default: "warn")
/// * `pretty` - Pretty-print JSON output (default: false)
/// * `rules` - Update rules run in order by `recordpath apply` (default: none)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,

    /// Update rules, applied in order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One update rule: write `value` at every leaf `path` resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub path: String,
    pub value: serde_json::Value,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pretty: false,
            rules: Vec::new(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/recordpath/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("recordpath");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        Self::load_from(&config_path).unwrap_or_default()
    }

    /// Loads configuration from `path`, reporting read and parse failures.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }
}
