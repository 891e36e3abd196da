//! Infrastructure layer for Counsel.
//!
//! Contains implementations of the traits defined in `counsel-core`:
//! SQLite storage via sqlx and the OpenAI-compatible completion provider,
//! plus the config loader and data-dir resolution.

pub mod config;
pub mod llm;
pub mod sqlite;
