pub mod config;
pub mod credentials;
pub mod error;

pub use config::{Config, LlmSettings, SpeechSettings, StorageSettings};
pub use credentials::{load_system_instruction, resolve_api_key};
pub use error::{ConfigError, ConfigResult};

use std::path::PathBuf;

/// Kiosk configuration directory (~/.kiosk)
pub fn kiosk_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kiosk"))
}

/// Default config file path (~/.kiosk/config.json)
pub fn default_config_path() -> Option<PathBuf> {
    kiosk_dir().map(|dir| dir.join("config.json"))
}
