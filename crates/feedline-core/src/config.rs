//! Configuration management for feedline.
//!
//! Loads configuration from ${FEEDLINE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for feedline configuration and data directories.
    //!
    //! FEEDLINE_HOME resolution order:
    //! 1. FEEDLINE_HOME environment variable (if set)
    //! 2. ~/.config/feedline (default)

    use std::path::PathBuf;

    /// Returns the feedline home directory.
    ///
    /// Checks FEEDLINE_HOME env var first, falls back to ~/.config/feedline,
    /// then to a relative `.feedline` directory when no home can be found.
    pub fn feedline_home() -> PathBuf {
        if let Ok(home) = std::env::var("FEEDLINE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".feedline"),
            |h| h.join(".config").join("feedline"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        feedline_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        feedline_home().join("logs")
    }
}

/// Twitter endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterConfig {
    /// REST API base used for the historical timeline.
    pub api_base_url: String,
    /// Live stream endpoint.
    pub stream_url: String,
    /// Value of the stream's `with` parameter.
    pub stream_with: String,
    /// Timeout for the historical request in seconds (0 disables).
    pub request_timeout_secs: u32,
}

impl TwitterConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "https://api.twitter.com/1.1";
    pub const DEFAULT_STREAM_URL: &'static str = "https://userstream.twitter.com/1.1/user.json";
    pub const DEFAULT_STREAM_WITH: &'static str = "followings";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Returns the request timeout, or `None` if disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0)
            .then(|| Duration::from_secs(u64::from(self.request_timeout_secs)))
    }
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            stream_url: Self::DEFAULT_STREAM_URL.to_string(),
            stream_with: Self::DEFAULT_STREAM_WITH.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Label shown on the feed panel border.
    pub title: String,

    /// Load recent messages before going live.
    pub backfill: bool,

    /// Endpoint configuration.
    pub twitter: TwitterConfig,
}

impl Config {
    pub const DEFAULT_TITLE: &'static str = "Tweets";

    /// Loads configuration from the default path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the commented default config to `path`.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_string(),
            backfill: true,
            twitter: TwitterConfig::default(),
        }
    }
}
