//! Conversation and message types for Counsel.
//!
//! These types model the persisted chat state: a conversation owned by a
//! client address, and the immutable messages inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from the llm module (it's used in both persisted
// messages and provider requests).
pub use crate::llm::MessageRole;

/// Placeholder title for conversations created before their first exchange.
pub const DEFAULT_CONVERSATION_TITLE: &str = "New Conversation";

/// A conversation thread owned by a single client address.
///
/// The client address is the only ownership token -- there is no account
/// system. That scheme breaks behind shared proxies/NAT and is kept here
/// deliberately; see the design notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    /// Network-level origin that created the conversation. Never serialized
    /// back to clients.
    #[serde(skip_serializing, default)]
    pub client_addr: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a fresh conversation owned by `client_addr`.
    ///
    /// Uses the supplied title, or the placeholder when absent. The first
    /// successful chat turn replaces the placeholder with the truncated
    /// question.
    pub fn new(client_addr: String, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            client_addr,
            title: title.unwrap_or_else(|| DEFAULT_CONVERSATION_TITLE.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single message within a conversation.
///
/// Messages are immutable once created and strictly ordered by `created_at`
/// within their conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Build a message with a fresh id and an explicit timestamp.
    ///
    /// The timestamp is supplied by the caller rather than sampled here so
    /// the orchestrator can guarantee strict ordering within a turn.
    pub fn new(
        conversation_id: Uuid,
        role: MessageRole,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            role,
            content,
            created_at,
        }
    }
}
