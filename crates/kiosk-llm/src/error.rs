use thiserror::Error;

/// Unified error type for generation calls
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("model returned no text")]
    EmptyResponse,

    #[error("generation failed after {attempts} attempts")]
    Exhausted { attempts: usize },

    #[error("config error: {0}")]
    Config(String),
}

impl GenerationError {
    /// Quota/overload failures select the fallback model and back off.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }

    /// Authorization failures are never retried.
    pub fn is_permission(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }
}

/// Error during best-effort translation
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response shape: {0}")]
    Parse(String),
}

/// Error during speech transcription
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("unsupported audio: {0}")]
    UnsupportedAudio(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerationError>;
