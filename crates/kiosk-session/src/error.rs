use thiserror::Error;

/// Persistence log error type
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("unknown role in stored row: {value}")]
    InvalidRole { value: String },

    #[error("storage error: {message}")]
    Other { message: String },
}

impl StorageError {
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Result type for log operations
pub type StorageResult<T> = Result<T, StorageError>;
