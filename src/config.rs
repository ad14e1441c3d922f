//! Configuration
//!
//! Settings for the AI backend, a TOML settings file for everything that
//! may survive between editing sessions, and a separate credentials file
//! so the API key never lands in the shareable settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubtitleError};
use crate::types::StyleSettings;

/// Default `generateContent` endpoint prefix, up to the model name.
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Default model.
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Settings for the Gemini backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Endpoint prefix up to the model name
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Backoff schedule for text rewrites, in seconds; empty disables
    /// retries
    pub retry_delays: Vec<u64>,
    /// Upper bound on inline media, in bytes
    pub max_media_bytes: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            api_key: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            retry_delays: vec![1, 2, 4, 8],
            max_media_bytes: 20 * 1024 * 1024,
        }
    }
}

impl AiConfig {
    /// Default configuration with the given key.
    pub fn with_api_key(api_key: impl Into<String>) -> AiConfig {
        AiConfig {
            api_key: api_key.into(),
            ..AiConfig::default()
        }
    }
}

/// Credentials file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsFile {
    /// The stored API key
    pub api_key: String,
}

impl CredentialsFile {
    pub fn new(api_key: impl Into<String>) -> CredentialsFile {
        CredentialsFile {
            api_key: api_key.into(),
        }
    }

    /// Load credentials from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: CredentialsFile =
            toml::from_str(&content).map_err(|e| SubtitleError::Config(e.to_string()))?;
        Ok(file)
    }

    /// Save credentials to a TOML file, creating parent directories as
    /// needed
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SubtitleError::Config(e.to_string()))?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Default location: `subgen/credentials.toml` under the platform
    /// config directory
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SubtitleError::Config("no config directory on this platform".to_string())
        })?;
        Ok(base.join("subgen").join("credentials.toml"))
    }
}

/// Settings file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsFile {
    /// AI backend settings
    pub ai: AiSettings,
    /// Export style settings
    pub style: Option<StyleSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSettings {
    /// Endpoint prefix up to the model name
    pub endpoint: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Backoff schedule for text rewrites, in seconds
    pub retry_delays: Option<Vec<u64>>,
    /// Upper bound on inline media, in bytes
    pub max_media_bytes: Option<usize>,
}

impl SettingsFile {
    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: SettingsFile =
            toml::from_str(&content).map_err(|e| SubtitleError::Config(e.to_string()))?;
        Ok(file)
    }

    /// Save settings to a TOML file, creating parent directories as needed
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SubtitleError::Config(e.to_string()))?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default settings file
    pub fn default_config() -> Self {
        let defaults = AiConfig::default();
        SettingsFile {
            ai: AiSettings {
                endpoint: Some(defaults.endpoint),
                model: Some(defaults.model),
                request_timeout_secs: Some(defaults.request_timeout_secs),
                retry_delays: Some(defaults.retry_delays),
                max_media_bytes: Some(defaults.max_media_bytes),
            },
            style: Some(StyleSettings::default()),
        }
    }

    /// Convert to AiConfig, attaching the key kept in the credentials file
    pub fn into_ai_config(self, api_key: impl Into<String>) -> AiConfig {
        let defaults = AiConfig::default();
        AiConfig {
            api_key: api_key.into(),
            endpoint: self.ai.endpoint.unwrap_or(defaults.endpoint),
            model: self.ai.model.unwrap_or(defaults.model),
            request_timeout_secs: self
                .ai
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            retry_delays: self.ai.retry_delays.unwrap_or(defaults.retry_delays),
            max_media_bytes: self.ai.max_media_bytes.unwrap_or(defaults.max_media_bytes),
        }
    }

    /// Export style from the file, or the built-in default
    pub fn style_settings(&self) -> StyleSettings {
        self.style.clone().unwrap_or_default()
    }

    /// Default location: `subgen/settings.toml` under the platform config
    /// directory
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or_else(|| {
            SubtitleError::Config("no config directory on this platform".to_string())
        })?;
        Ok(base.join("subgen").join("settings.toml"))
    }
}
