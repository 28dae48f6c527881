//! Configuration management for sweeper.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The loaded [`AppConfig`] is handed to
//! the scanner explicitly; nothing here is global.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/sweeper/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Content source settings
    pub source: SourceConfig,
    /// Traversal and snippet settings
    pub scanning: ScanningConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// if the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SWEEPER_API_TOKEN`: Read token for the content source
    /// - `SWEEPER_PREVIEW`: Fetch draft/preview content (true/false)
    /// - `SWEEPER_MAX_DEPTH`: Override traversal depth limit
    /// - `SWEEPER_MAX_CONCURRENT_FETCHES`: Override scope fetch fan-out
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("SWEEPER_API_TOKEN") {
            if !token.trim().is_empty() {
                self.source.api_token = Some(token);
                tracing::debug!("Loaded source.api_token from env");
            }
        }

        if let Ok(val) = std::env::var("SWEEPER_PREVIEW") {
            if let Ok(preview) = val.parse() {
                self.source.preview = preview;
                tracing::debug!("Override source.preview from env: {}", preview);
            }
        }

        if let Ok(val) = std::env::var("SWEEPER_MAX_DEPTH") {
            if let Ok(depth) = val.parse() {
                self.scanning.max_depth = depth;
                tracing::debug!("Override scanning.max_depth from env: {}", depth);
            }
        }

        if let Ok(val) = std::env::var("SWEEPER_MAX_CONCURRENT_FETCHES") {
            if let Ok(max) = val.parse() {
                self.source.max_concurrent_fetches = max;
                tracing::debug!("Override source.max_concurrent_fetches from env: {}", max);
            }
        }
    }

    /// Check that values are usable.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for a zero fetch concurrency or
    /// a zero snippet cap.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.source.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue {
                field: "source.max_concurrent_fetches".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.scanning.max_snippets_per_path == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.max_snippets_per_path".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist. The API token is
    /// never written.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> ConfigResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/sweeper/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "sweeper", "sweeper").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Content source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Fetch preview (draft) content instead of published content
    pub preview: bool,
    /// Number of scope fetches allowed in flight at once
    pub max_concurrent_fetches: usize,
    /// Read token for the content source (supplied by the caller, not stored here)
    #[serde(skip)]
    pub api_token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            preview: false,
            max_concurrent_fetches: 4,
            api_token: None,
        }
    }
}

/// Traversal and snippet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Deepest nesting level inspected (root body = 0)
    pub max_depth: usize,
    /// Characters of context kept on each side of a match
    pub snippet_context_chars: usize,
    /// Snippets generated per path before only counting continues
    pub max_snippets_per_path: usize,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            snippet_context_chars: 100,
            max_snippets_per_path: 3,
        }
    }
}
