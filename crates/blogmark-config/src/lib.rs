use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config value for `{key}`: {reason}")]
    ConfigInvalid { key: &'static str, reason: String },
}

/// Render settings. Every key is optional in the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub preview: PreviewConfig,
    pub toc: TocConfig,
}

/// Link preview settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub enabled: bool,
    /// Bounded wait for providers without a timeout of their own.
    pub timeout_secs: u64,
    pub github_timeout_secs: u64,
    pub providers: ProviderToggles,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: 5,
            github_timeout_secs: 10,
            providers: ProviderToggles::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderToggles {
    pub youtube: bool,
    pub github: bool,
    pub reddit: bool,
    pub gopkg: bool,
}

impl Default for ProviderToggles {
    fn default() -> Self {
        Self {
            youtube: true,
            github: true,
            reddit: true,
            gopkg: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Deepest heading level listed in the table of contents.
    pub max_depth: u8,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.validate()?;

        Ok(Some(config))
    }

    /// Parse and validate config text that did not come from a file.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|source| ConfigError::ConfigParseError {
                config_path: PathBuf::from("<inline>"),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.preview.timeout_secs == 0 {
            return Err(ConfigError::ConfigInvalid {
                key: "preview.timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if self.preview.github_timeout_secs == 0 {
            return Err(ConfigError::ConfigInvalid {
                key: "preview.github_timeout_secs",
                reason: "must be at least 1 second".to_string(),
            });
        }
        if !(1..=5).contains(&self.toc.max_depth) {
            return Err(ConfigError::ConfigInvalid {
                key: "toc.max_depth",
                reason: "must be between 1 and 5".to_string(),
            });
        }
        Ok(())
    }
}
