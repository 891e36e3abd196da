//! SQLite persistence via sqlx.

pub mod chat;
pub mod pool;

pub use chat::SqliteConversationRepository;
pub use pool::DatabasePool;
