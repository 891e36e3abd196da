//! Business logic and repository trait definitions for Counsel.
//!
//! This crate defines the "ports" (repository and provider traits) that the
//! infrastructure layer implements. It depends only on `counsel-types` --
//! never on `counsel-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
