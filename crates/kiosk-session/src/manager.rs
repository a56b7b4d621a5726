//! In-memory transcript for one active session.
//!
//! The manager holds the ordered message list the shell renders, seeded
//! from the persistence log on session start. Appends are write-through:
//! in-memory first, then the log. The log write is best-effort history; a
//! failure is reported but the in-memory transcript keeps the message.

use std::sync::Arc;

use tracing::debug;

use crate::error::StorageResult;
use crate::store::TranscriptStore;
use crate::types::{Message, Role};

/// Greeting shown when a session has no stored history.
pub const DEFAULT_GREETING: &str = "Hii 🤖, I'm here to help you";

/// Ordered message history for one session
pub struct TranscriptManager {
    store: Arc<dyn TranscriptStore>,
    session_id: String,
    messages: Vec<Message>,
}

impl TranscriptManager {
    /// Load the stored history for the session, seeding the default
    /// greeting when the log holds nothing for it. The greeting lives in
    /// memory only; it is never written to the log.
    pub async fn load(
        store: Arc<dyn TranscriptStore>,
        session_id: impl Into<String>,
    ) -> StorageResult<Self> {
        let session_id = session_id.into();
        let mut messages = store.load(&session_id).await?;
        if messages.is_empty() {
            debug!(session_id = %session_id, "no stored history, seeding greeting");
            messages.push(Message::assistant(DEFAULT_GREETING));
        }
        Ok(Self {
            store,
            session_id,
            messages,
        })
    }

    /// Start a transcript without consulting the log, greeting only.
    /// Used when the stored history could not be read.
    pub fn fresh(store: Arc<dyn TranscriptStore>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
            messages: vec![Message::assistant(DEFAULT_GREETING)],
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Oldest-first view of the live transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Append a user message.
    pub async fn append_user(&mut self, content: impl Into<String>) -> StorageResult<()> {
        self.append(Role::User, content).await
    }

    /// Append an assistant message.
    pub async fn append_assistant(&mut self, content: impl Into<String>) -> StorageResult<()> {
        self.append(Role::Assistant, content).await
    }

    /// Push to the in-memory transcript, then write through to the log.
    /// The in-memory append survives a failed log write; the caller decides
    /// what to do with the error.
    async fn append(&mut self, role: Role, content: impl Into<String>) -> StorageResult<()> {
        let message = match role {
            Role::User => Message::user(content),
            Role::Assistant => Message::assistant(content),
        };
        self.messages.push(message.clone());
        self.store.append(&self.session_id, &message).await
    }
}
