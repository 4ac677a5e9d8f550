//! CLI configuration.

use querypay_ops::{OpsConfig, DEFAULT_CACHE_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CliError, CliResult};

/// Default chain id for channel id computation.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default challenge duration in seconds (one day).
pub const DEFAULT_CHALLENGE_DURATION: u64 = 86_400;

/// CLI configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Channel configuration.
    pub channel: ChannelSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

impl CliConfig {
    /// Load configuration from a file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Operations configuration derived from the `[channel]` section.
    ///
    /// The CLI only displays it. Applications embedding a
    /// `ChannelManager` load the same file and pass this to
    /// `ChannelManager::with_config`.
    pub fn ops_config(&self) -> OpsConfig {
        OpsConfig::default()
            .with_initial_cache_capacity(self.channel.initial_cache_capacity)
            .with_zero_value_shortcut(self.channel.zero_value_shortcut)
    }
}

/// Channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSection {
    /// Chain id used when none is given on the command line.
    pub chain_id: u64,
    /// Challenge duration used when none is given on the command line.
    pub challenge_duration: u64,
    /// Number of channels the cache is sized for up front.
    pub initial_cache_capacity: usize,
    /// Skip the funding call for zero-value channels.
    pub zero_value_shortcut: bool,
}

impl Default for ChannelSection {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            challenge_duration: DEFAULT_CHALLENGE_DURATION,
            initial_cache_capacity: DEFAULT_CACHE_CAPACITY,
            zero_value_shortcut: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Filter directives used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

/// Default configuration file location.
///
/// `$QUERYPAY_CONFIG`, else `$HOME/.querypay/config.toml`, else
/// `querypay.toml` in the working directory.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("QUERYPAY_CONFIG") {
        return PathBuf::from(path);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".querypay").join("config.toml"),
        None => PathBuf::from("querypay.toml"),
    }
}
