//! Startup inputs: the API credential and the system-instruction document.
//!
//! Both are required; the process refuses to start without them.

use std::path::Path;

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Environment variables consulted for the API key, in order.
const KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Local fallback files consulted when no environment variable is set.
const KEY_FILES: [&str; 2] = ["key.txt", "mykey.txt"];

/// Resolve the API credential: environment first, then local key files in
/// the working directory.
pub fn resolve_api_key() -> ConfigResult<String> {
    resolve_api_key_in(Path::new("."))
}

/// Resolution rooted at `dir` instead of the working directory.
pub fn resolve_api_key_in(dir: &Path) -> ConfigResult<String> {
    env_api_key()
        .or_else(|| file_api_key(dir))
        .ok_or(ConfigError::MissingApiKey)
}

fn env_api_key() -> Option<String> {
    for var in KEY_ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                debug!(source = var, "resolved API key from environment");
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn file_api_key(dir: &Path) -> Option<String> {
    for file in KEY_FILES {
        if let Ok(content) = std::fs::read_to_string(dir.join(file)) {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                debug!(source = file, "resolved API key from file");
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Load the system instruction document bound to every generation request.
pub fn load_system_instruction(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::MissingInstructions(path.to_path_buf()))
}
