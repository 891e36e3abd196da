//! ConversationRepository trait definition.
//!
//! CRUD operations for conversations and messages, plus the atomic turn
//! write. Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use counsel_types::chat::{Conversation, Message};
use counsel_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in counsel-infra (e.g., `SqliteConversationRepository`).
pub trait ConversationRepository: Send + Sync {
    /// Persist a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a conversation by id, scoped to the owning client address.
    ///
    /// Returns `None` both when the id does not exist and when it belongs to
    /// a different address; callers cannot distinguish the two.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
        client_addr: &str,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations owned by a client address, ordered by updated_at DESC.
    fn list_conversations(
        &self,
        client_addr: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Get messages for a conversation, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Persist one complete chat turn atomically.
    ///
    /// Inserts the user and assistant messages, applies the first-turn title
    /// when given, and bumps the conversation's updated_at -- all in a single
    /// transaction. Either the whole turn lands or none of it does.
    fn record_turn(
        &self,
        user_message: &Message,
        assistant_message: &Message,
        title: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
