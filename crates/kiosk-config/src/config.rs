use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub llm: LlmSettings,
    pub storage: StorageSettings,
    pub speech: SpeechSettings,
    /// System-instruction document read at startup; required to exist.
    pub instructions_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmSettings::default(),
            storage: StorageSettings::default(),
            speech: SpeechSettings::default(),
            instructions_path: PathBuf::from("final.txt"),
        }
    }
}

/// Generation model settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSettings {
    pub primary_model: String,
    pub fallback_model: String,
    pub request_timeout_secs: u64,
    /// Minimum spacing between outbound generation calls.
    pub min_request_interval_secs: f64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            primary_model: "gemini-1.5-pro-latest".to_string(),
            fallback_model: "gemini-1.5-flash-latest".to_string(),
            request_timeout_secs: 30,
            min_request_interval_secs: 2.0,
        }
    }
}

/// Transcript log settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub db_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("chat_history.db"),
        }
    }
}

/// Speech recognition settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeechSettings {
    pub language: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
        }
    }
}

impl Config {
    /// Read settings from `path`, falling back to defaults when the file
    /// does not exist.
    pub async fn load(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            info!("loading config from {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write settings to `path` as pretty JSON, creating parent directories.
    pub async fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        info!("config saved to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.llm.primary_model.is_empty() || self.llm.fallback_model.is_empty() {
            return Err(ConfigError::Validation(
                "model names cannot be empty".to_string(),
            ));
        }
        if self.llm.min_request_interval_secs < 0.0 {
            return Err(ConfigError::Validation(
                "min_request_interval_secs cannot be negative".to_string(),
            ));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
