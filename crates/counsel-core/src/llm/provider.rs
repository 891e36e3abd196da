//! LlmProvider trait definition.
//!
//! The app performs exactly one blocking completion per chat turn -- no
//! streaming, no fan-out -- so the trait is a single `complete` call.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use counsel_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM completion backends.
///
/// Implementations live in counsel-infra (e.g., `OpenAiChatProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
