//! Chat transcript types for mentorchat.
//!
//! A `ChatRecord` is one rendered line of the conversation and the
//! `MessageLog` is the ordered transcript the presentation layers re-render.
//! The log is append-only; the only other mutation is a full reset when the
//! system prompt changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::llm::MessageRole;

/// A single record in the rendered transcript.
///
/// Records are only ever created with the `user` or `assistant` role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Insertion-ordered transcript of user and assistant records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageLog {
    records: Vec<ChatRecord>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user record.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.records.push(ChatRecord::new(MessageRole::User, content));
    }

    /// Append an assistant record (a reply, the greeting, or an error notice).
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.records
            .push(ChatRecord::new(MessageRole::Assistant, content));
    }

    /// Drop every record. Only used when the system prompt changes.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ChatRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&ChatRecord> {
        self.records.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChatRecord> {
        self.records.iter()
    }
}
