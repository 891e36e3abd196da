use thiserror::Error;

/// Errors from repository operations (used by trait definitions in counsel-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by chat-turn orchestration.
///
/// `NotFound` covers both a missing conversation id and an id owned by a
/// different client address -- the two are indistinguishable to the caller
/// on purpose.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("conversation not found")]
    ConversationNotFound,

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("language model call failed: {0}")]
    Llm(#[from] crate::llm::LlmError),
}
