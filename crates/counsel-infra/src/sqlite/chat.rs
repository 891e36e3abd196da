//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `counsel-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, writes on the
//! single-connection writer pool. `record_turn` is the one multi-statement
//! operation and runs inside a transaction.

use chrono::{DateTime, Utc};
use counsel_core::chat::repository::ConversationRepository;
use counsel_types::chat::{Conversation, Message};
use counsel_types::error::RepositoryError;
use counsel_types::llm::MessageRole;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

/// Internal row type for mapping SQLite rows to domain Conversation.
struct ConversationRow {
    id: String,
    client_addr: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            client_addr: row.try_get("client_addr")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;

        Ok(Conversation {
            id,
            client_addr: self.client_addr,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let conversation_id = Uuid::parse_str(&self.conversation_id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(Message {
            id,
            conversation_id,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversations (id, client_addr, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(&conversation.client_addr)
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .bind(format_datetime(&conversation.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_conversation(
        &self,
        conversation_id: &Uuid,
        client_addr: &str,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ? AND client_addr = ?")
            .bind(conversation_id.to_string())
            .bind(client_addr)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        client_addr: &str,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE client_addr = ? ORDER BY updated_at DESC",
        )
        .bind(client_addr)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conv_row = ConversationRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(conv_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages WHERE conversation_id = ? ORDER BY created_at ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }

    async fn record_turn(
        &self,
        user_message: &Message,
        assistant_message: &Message,
        title: Option<&str>,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let conversation_id = user_message.conversation_id;

        let mut tx = self
            .pool
            .writer
            .begin()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        for message in [user_message, assistant_message] {
            sqlx::query(
                r#"INSERT INTO messages (id, conversation_id, role, content, created_at)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(message.id.to_string())
            .bind(message.conversation_id.to_string())
            .bind(message.role.to_string())
            .bind(&message.content)
            .bind(format_datetime(&message.created_at))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        }

        let result = match title {
            Some(title) => {
                sqlx::query("UPDATE conversations SET title = ?, updated_at = ? WHERE id = ?")
                    .bind(title)
                    .bind(format_datetime(&updated_at))
                    .bind(conversation_id.to_string())
                    .execute(&mut *tx)
                    .await
            }
            None => {
                sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
                    .bind(format_datetime(&updated_at))
                    .bind(conversation_id.to_string())
                    .execute(&mut *tx)
                    .await
            }
        }
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // Dropping the transaction on the error path rolls back both inserts.
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::DatabasePool;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn make_conversation(client_addr: &str) -> Conversation {
        Conversation::new(client_addr.to_string(), None)
    }

    fn make_message(conversation_id: Uuid, role: MessageRole, content: &str) -> Message {
        Message::new(conversation_id, role, content.to_string(), Utc::now())
    }

    fn make_turn(conversation_id: Uuid) -> (Message, Message) {
        let user = make_message(conversation_id, MessageRole::User, "What is a tort?");
        let assistant = Message::new(
            conversation_id,
            MessageRole::Assistant,
            "A civil wrong.".to_string(),
            user.created_at + chrono::Duration::milliseconds(5),
        );
        (user, assistant)
    }

    #[tokio::test]
    async fn test_create_and_get_conversation() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let found = repo
            .get_conversation(&conv.id, "203.0.113.7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, conv.id);
        assert_eq!(found.title, "New Conversation");
        assert_eq!(found.client_addr, "203.0.113.7");
    }

    #[tokio::test]
    async fn test_get_conversation_scoped_to_owner() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let found = repo.get_conversation(&conv.id, "198.51.100.9").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_conversations_filters_by_address_and_orders() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let mut old = make_conversation("203.0.113.7");
        old.updated_at = Utc::now() - chrono::Duration::hours(1);
        repo.create_conversation(&old).await.unwrap();

        let fresh = make_conversation("203.0.113.7");
        repo.create_conversation(&fresh).await.unwrap();

        let other = make_conversation("198.51.100.9");
        repo.create_conversation(&other).await.unwrap();

        let listed = repo.list_conversations("203.0.113.7").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, fresh.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[tokio::test]
    async fn test_record_turn_persists_pair_and_title() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let (user, assistant) = make_turn(conv.id);
        let updated_at = assistant.created_at;
        repo.record_turn(&user, &assistant, Some("What is a tort?"), updated_at)
            .await
            .unwrap();

        let messages = repo.get_messages(&conv.id).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert!(messages[0].created_at < messages[1].created_at);

        let found = repo
            .get_conversation(&conv.id, "203.0.113.7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "What is a tort?");
        assert_eq!(found.updated_at, updated_at);
    }

    #[tokio::test]
    async fn test_record_turn_without_title_keeps_existing() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let mut conv = make_conversation("203.0.113.7");
        conv.title = "First question".to_string();
        repo.create_conversation(&conv).await.unwrap();

        let (user, assistant) = make_turn(conv.id);
        repo.record_turn(&user, &assistant, None, assistant.created_at)
            .await
            .unwrap();

        let found = repo
            .get_conversation(&conv.id, "203.0.113.7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "First question");
    }

    #[tokio::test]
    async fn test_record_turn_unknown_conversation_rolls_back() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());

        // Insert a real conversation so the messages FK would be satisfiable,
        // then target a different id for the turn.
        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let ghost_id = Uuid::now_v7();
        let (user, assistant) = make_turn(ghost_id);
        let err = repo
            .record_turn(&user, &assistant, None, assistant.created_at)
            .await
            .unwrap_err();
        // FK violation on insert, or NotFound on the update -- either way the
        // transaction never commits.
        assert!(matches!(
            err,
            RepositoryError::Query(_) | RepositoryError::NotFound
        ));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 0, "no messages from a failed turn may remain");
    }

    #[tokio::test]
    async fn test_cascade_delete_removes_messages() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());

        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let (user, assistant) = make_turn(conv.id);
        repo.record_turn(&user, &assistant, None, assistant.created_at)
            .await
            .unwrap();

        // The application never deletes; the cascade exists at storage level only.
        sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(conv.id.to_string())
            .execute(&pool.writer)
            .await
            .unwrap();

        let messages = repo.get_messages(&conv.id).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_messages_roundtrip_content() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        let conv = make_conversation("203.0.113.7");
        repo.create_conversation(&conv).await.unwrap();

        let user = make_message(conv.id, MessageRole::User, "Is a verbal contract binding?");
        let assistant = Message::new(
            conv.id,
            MessageRole::Assistant,
            "Often yes, though proof is harder; consult an attorney.".to_string(),
            user.created_at + chrono::Duration::milliseconds(3),
        );
        repo.record_turn(&user, &assistant, None, assistant.created_at)
            .await
            .unwrap();

        let messages = repo.get_messages(&conv.id).await.unwrap();
        assert_eq!(messages[0].content, "Is a verbal contract binding?");
        assert_eq!(messages[1].conversation_id, conv.id);
    }
}
