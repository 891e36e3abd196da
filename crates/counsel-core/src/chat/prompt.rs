//! Prompt assembly and title derivation for chat turns.

use counsel_types::chat::Message;
use counsel_types::llm::{MessageRole, PromptMessage};

/// System instruction sent ahead of every conversation.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert legal advisor providing general legal guidance. \
Your responses should be clear, professional, and informative.
- You may explain legal principles, procedures, and general best practices.
- You must not provide personal legal representation, draft legal documents, \
or offer definitive legal conclusions.
- Always encourage users to consult a qualified attorney for case-specific advice.";

/// Maximum character length of a derived conversation title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Build the ordered message list for one turn: prior history followed by
/// the new user question. The system instruction travels separately in
/// `CompletionRequest::system`.
pub fn build_messages(history: &[Message], question: &str) -> Vec<PromptMessage> {
    let mut messages: Vec<PromptMessage> = history
        .iter()
        .map(|m| PromptMessage {
            role: m.role,
            content: m.content.clone(),
        })
        .collect();

    messages.push(PromptMessage {
        role: MessageRole::User,
        content: question.to_string(),
    });

    messages
}

/// Derive a conversation title from the first question.
///
/// Char-based truncation, not bytes, so multibyte questions never split a
/// codepoint.
pub fn derive_title(question: &str) -> String {
    if question.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = question.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        question.to_string()
    }
}
