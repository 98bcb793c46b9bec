use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ApiResult;

/// Application name used for config and token paths
pub const APP_NAME: &str = "frontdesk";

/// Base URL of the booking API when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Dashboard refresh cadence in seconds
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Configuration struct for the booking API client and dashboard
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub refresh_secs: Option<u64>,
    pub log_level: Option<String>,
    pub plain_output: Option<bool>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            refresh_secs: Some(DEFAULT_REFRESH_SECS),
            log_level: None,
            plain_output: Some(false),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration
    pub fn new(
        base_url: Option<String>,
        refresh_secs: Option<u64>,
        log_level: Option<String>,
        plain_output: Option<bool>,
    ) -> Self {
        Self {
            base_url,
            refresh_secs,
            log_level,
            plain_output,
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> ApiResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                crate::errors::ApiError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::errors::ApiError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the configuration from the default path and applies
    /// `FRONTDESK_*` environment overrides on top.
    pub fn load_default() -> ApiResult<Self> {
        let path = get_default_config_file(APP_NAME)?;
        Ok(Self::load_from_file(&path)?.with_env_overrides())
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> ApiResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            crate::errors::ApiError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        // Ensure the directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                crate::errors::ApiError::ConfigError(format!(
                    "Failed to create config directory: {}",
                    e
                ))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            crate::errors::ApiError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            refresh_secs: other.refresh_secs.or(self.refresh_secs),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            plain_output: other.plain_output.or(self.plain_output),
        }
    }

    /// Applies `FRONTDESK_BASE_URL` and `FRONTDESK_REFRESH_SECS` overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("FRONTDESK_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = Some(base_url);
            }
        }
        if let Ok(secs) = std::env::var("FRONTDESK_REFRESH_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                self.refresh_secs = Some(secs);
            }
        }
        self
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> ApiResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        crate::errors::ApiError::ConfigError("Could not determine home directory".to_string())
    })?;

    let config_dir = home_dir.join(".config").join(app_name);

    Ok(config_dir)
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> ApiResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}
