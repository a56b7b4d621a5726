use std::path::PathBuf;

use thiserror::Error;

/// Configuration error type. The missing-credential and
/// missing-instructions variants are startup-fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(
        "API key not found: set GEMINI_API_KEY or GOOGLE_API_KEY, or create key.txt/mykey.txt"
    )]
    MissingApiKey,

    #[error("system instruction file not found: {0:?}")]
    MissingInstructions(PathBuf),

    #[error("validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
