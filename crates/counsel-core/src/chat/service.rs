//! Chat service orchestrating conversation resolution and chat turns.
//!
//! ChatService coordinates the ConversationRepository and the LlmProvider:
//! resolving or creating the conversation for a request, assembling the
//! prompt from persisted history, invoking the provider once, and persisting
//! the completed turn atomically.

use chrono::{Duration, Utc};
use counsel_types::chat::{Conversation, Message};
use counsel_types::error::{ChatError, RepositoryError};
use counsel_types::llm::{CompletionRequest, MessageRole};
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::prompt;
use crate::chat::repository::ConversationRepository;
use crate::llm::provider::LlmProvider;

/// Result of one successful chat turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub conversation_id: Uuid,
}

/// Orchestrates conversation lifecycle and chat turns.
///
/// Generic over `ConversationRepository` and `LlmProvider` to maintain
/// clean architecture (counsel-core never depends on counsel-infra).
pub struct ChatService<R: ConversationRepository, P: LlmProvider> {
    repo: R,
    provider: P,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl<R: ConversationRepository, P: LlmProvider> ChatService<R, P> {
    /// Create a new chat service with the given repository and provider.
    pub fn new(repo: R, provider: P, model: String, temperature: f64, max_tokens: u32) -> Self {
        Self {
            repo,
            provider,
            model,
            temperature,
            max_tokens,
        }
    }

    /// Access the conversation repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // --- Conversation lifecycle ---

    /// Create a conversation explicitly, owned by `client_addr`.
    ///
    /// A missing title gets the placeholder; the first chat turn replaces it.
    pub async fn create_conversation(
        &self,
        client_addr: &str,
        title: Option<String>,
    ) -> Result<Conversation, RepositoryError> {
        let conversation = Conversation::new(client_addr.to_string(), title);
        self.repo.create_conversation(&conversation).await?;
        info!(conversation_id = %conversation.id, "Conversation created");
        Ok(conversation)
    }

    /// List conversations owned by `client_addr`, most recently updated first.
    pub async fn list_conversations(
        &self,
        client_addr: &str,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        self.repo.list_conversations(client_addr).await
    }

    /// Get the ordered messages of a conversation owned by `client_addr`.
    ///
    /// A nonexistent or foreign-owned id is an error, never a silently empty
    /// list.
    pub async fn get_messages(
        &self,
        client_addr: &str,
        conversation_id: &Uuid,
    ) -> Result<Vec<Message>, ChatError> {
        self.repo
            .get_conversation(conversation_id, client_addr)
            .await?
            .ok_or(ChatError::ConversationNotFound)?;

        Ok(self.repo.get_messages(conversation_id).await?)
    }

    /// Resolve the conversation for a chat turn.
    ///
    /// With an id: the conversation must exist and be owned by the address.
    /// Without one: a fresh conversation is created and committed up front,
    /// so it survives even if the turn itself fails (matching explicit
    /// creation via the API).
    async fn resolve_conversation(
        &self,
        client_addr: &str,
        conversation_id: Option<Uuid>,
    ) -> Result<Conversation, ChatError> {
        match conversation_id {
            Some(id) => self
                .repo
                .get_conversation(&id, client_addr)
                .await?
                .ok_or(ChatError::ConversationNotFound),
            None => {
                let conversation = Conversation::new(client_addr.to_string(), None);
                self.repo.create_conversation(&conversation).await?;
                info!(conversation_id = %conversation.id, "Conversation created for first turn");
                Ok(conversation)
            }
        }
    }

    // --- Chat turn ---

    /// Run one complete chat turn.
    ///
    /// Loads prior history, assembles the prompt (system instruction +
    /// history + new question), calls the provider once, then persists both
    /// messages of the turn in a single transaction together with the
    /// first-turn title and the updated_at bump. A provider failure persists
    /// nothing for the turn.
    pub async fn chat_turn(
        &self,
        client_addr: &str,
        question: &str,
        conversation_id: Option<Uuid>,
    ) -> Result<ChatReply, ChatError> {
        let conversation = self
            .resolve_conversation(client_addr, conversation_id)
            .await?;

        let history = self.repo.get_messages(&conversation.id).await?;

        let request = CompletionRequest {
            model: self.model.clone(),
            messages: prompt::build_messages(&history, question),
            system: Some(prompt::SYSTEM_INSTRUCTION.to_string()),
            max_tokens: self.max_tokens,
            temperature: Some(self.temperature),
        };

        // User timestamp sampled before the provider call, assistant after,
        // so the pair is strictly ordered.
        let user_at = Utc::now();

        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!(conversation_id = %conversation.id, error = %e, "Provider call failed, turn discarded");
            e
        })?;

        let mut assistant_at = Utc::now();
        if assistant_at <= user_at {
            // Coarse clocks may not tick across a fast (e.g. mocked) call.
            assistant_at = user_at + Duration::milliseconds(1);
        }

        let answer = response.content.trim().to_string();

        let user_message = Message::new(
            conversation.id,
            MessageRole::User,
            question.to_string(),
            user_at,
        );
        let assistant_message = Message::new(
            conversation.id,
            MessageRole::Assistant,
            answer.clone(),
            assistant_at,
        );

        // Title is derived exactly once, on the first successful exchange.
        let title = history.is_empty().then(|| prompt::derive_title(question));

        self.repo
            .record_turn(
                &user_message,
                &assistant_message,
                title.as_deref(),
                assistant_at,
            )
            .await?;

        info!(
            conversation_id = %conversation.id,
            provider = self.provider.name(),
            "Chat turn completed"
        );

        Ok(ChatReply {
            answer,
            conversation_id: conversation.id,
        })
    }
}
