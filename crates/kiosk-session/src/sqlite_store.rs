//! SQLite-backed persistence log.
//!
//! One table, keyed by session id:
//!
//! ```text
//! chat_history(id, session_id, role, content, created_at)
//! ```
//!
//! Queries filter by session id and order by timestamp, tie-broken by the
//! rowid so same-second appends keep their insertion order.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::{StorageError, StorageResult};
use crate::store::TranscriptStore;
use crate::types::{Message, Role};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS chat_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// SQLite transcript log
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the log at `path`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory log, used by tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::other("connection mutex poisoned"))
    }
}

#[async_trait]
impl TranscriptStore for SqliteStore {
    async fn append(&self, session_id: &str, message: &Message) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO chat_history (session_id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                session_id,
                message.role.to_string(),
                message.content,
                message.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn load(&self, session_id: &str) -> StorageResult<Vec<Message>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT role, content, created_at FROM chat_history WHERE session_id = ?1 ORDER BY created_at, id",
        )?;
        let rows = stmt.query_map(params![session_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut messages = Vec::new();
        for row in rows {
            let (role, content, created_at) = row?;
            let role: Role = role.parse()?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StorageError::other(format!("bad timestamp in stored row: {e}")))?
                .with_timezone(&Utc);
            messages.push(Message {
                id: uuid::Uuid::new_v4().to_string(),
                role,
                content,
                created_at,
            });
        }
        Ok(messages)
    }
}
