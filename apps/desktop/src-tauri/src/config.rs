//! # Application Configuration
//!
//! Configuration for the desktop client. The only mandatory setting is
//! the base URL of the store backend.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ATLAS_API_URL=http://192.168.1.20:8000                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/backoffice/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.atlas.backoffice/config.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:8000                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [backend]
//! url = "http://192.168.1.20:8000"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while loading or saving the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no config path available")]
    NoPath,
}

/// Result alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Backend Settings
// =============================================================================

/// Connection settings for the store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the store backend (scheme + host + port).
    #[serde(default = "default_backend_url")]
    pub url: String,
}

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_backend_url(),
        }
    }
}

// =============================================================================
// App Config
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store backend connection settings.
    #[serde(default)]
    pub backend: BackendSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        // Try to load from config file
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading app config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        // Override with environment variables
        config.apply_env_overrides();

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load app config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, creating the config directory on
    /// first run.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "App config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.url
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ATLAS_API_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "atlas", "backoffice").map(|dirs| {
            let config_dir = dirs.config_dir();
            config_dir.join("config.toml")
        })
    }

    /// Returns the backend base URL.
    pub fn backend_url(&self) -> &str {
        &self.backend.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.backend_url(), "http://127.0.0.1:8000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        // Non-HTTP scheme should fail
        config.backend.url = "ftp://somewhere".to_string();
        assert!(config.validate().is_err());

        config.backend.url = "https://store.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing() {
        let config: AppConfig = toml::from_str("[backend]\nurl = \"http://10.0.0.5:8000\"\n")
            .expect("config should parse");
        assert_eq!(config.backend_url(), "http://10.0.0.5:8000");

        // Missing sections fall back to defaults
        let config: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.backend_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_toml_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("config should serialize");
        assert!(toml_str.contains("[backend]"));
        assert!(toml_str.contains("url"));
    }
}
