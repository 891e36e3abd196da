//! Shared domain types for Counsel.
//!
//! This crate contains the core domain types used across the Counsel legal
//! advisor: Conversation, Message, LLM request/response shapes, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
