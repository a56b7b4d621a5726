//! # Kiosk Session Storage
//!
//! Per-session transcript handling for the Kiosk chat assistant:
//!
//! - **Message types**: append-only `(role, content, timestamp)` records
//! - **Persistence log**: a SQLite table keyed by session id
//! - **Transcript manager**: the in-memory history for one session, seeded
//!   from the log or a default greeting
//!
//! The log is advisory history, not transactional state: a failed write is
//! surfaced to the caller but never rolls back the in-memory transcript.

pub mod error;
pub mod manager;
pub mod sqlite_store;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use manager::{TranscriptManager, DEFAULT_GREETING};
pub use sqlite_store::SqliteStore;
pub use store::TranscriptStore;
pub use types::{Message, Role};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
