use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::Message;

/// Persistence log for per-session transcripts.
///
/// Append-only: there are no update or delete operations. Rows for
/// different sessions may be written concurrently; ordering is only
/// guaranteed within one session.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Durably append one message under the session key.
    async fn append(&self, session_id: &str, message: &Message) -> StorageResult<()>;

    /// Ordered history for the session, oldest first.
    async fn load(&self, session_id: &str) -> StorageResult<Vec<Message>>;
}
