//! Conversation resolution and chat-turn orchestration.

pub mod prompt;
pub mod repository;
pub mod service;

pub use service::{ChatReply, ChatService};
