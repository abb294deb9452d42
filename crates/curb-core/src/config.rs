use anyhow::{Context, Result};
use chrono::NaiveTime;
use curb_ai::AiConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Get the default config file location (`<config_dir>/curb/config.toml`).
///
/// # Errors
///
/// Returns an error if the config directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf> {
    let mut path =
        dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Failed to get config dir"))?;
    path.push("curb");
    path.push("config.toml");
    Ok(path)
}

/// Usage policy: what counts as a violation and how often to look
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub blacklist: Vec<String>,
    #[serde(with = "hhmm")]
    pub curfew_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub curfew_end: NaiveTime,
    pub max_usage_seconds: u64,
    pub poll_interval_seconds: u64,
    pub intervention_cooldown_seconds: u64,
    pub curfew_blocks_all: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            blacklist: [
                "chrome.exe",
                "discord.exe",
                "vlc.exe",
                "steam.exe",
                "steamwebhelper.exe",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            curfew_start: NaiveTime::from_hms_opt(1, 0, 0).unwrap_or_default(),
            curfew_end: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default(),
            max_usage_seconds: 7200,
            poll_interval_seconds: 5,
            intervention_cooldown_seconds: 60,
            curfew_blocks_all: true,
        }
    }
}

/// External tool settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Timeout for listing and termination; the foreground script gets twice this
    pub command_timeout_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system32_dir: Option<PathBuf>,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            command_timeout_seconds: 5,
            system32_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Seconds the block stays locked before it can be dismissed
    pub countdown_seconds: u64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            countdown_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

/// Whole configuration file, read once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurbConfig {
    pub policy: PolicyConfig,
    pub inspector: InspectorConfig,
    pub ai: AiConfig,
    pub presentation: PresentationConfig,
    pub storage: StorageConfig,
}

impl CurbConfig {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (default_config_path()?, false),
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            log::info!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the poll loop cannot work with
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.policy.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "policy.poll_interval_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.inspector.command_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "inspector.command_timeout_seconds",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.policy.blacklist.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "policy.blacklist",
                reason: "entries must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Render as TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Write the default configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists and `force` is false, or on I/O failure
    pub fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config file already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        std::fs::write(path, Self::default().to_toml_string()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

/// `HH:MM` (de)serialization for curfew bounds
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}
