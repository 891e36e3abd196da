//! Application state wiring all services together.
//!
//! AppState holds the concrete service instance used by the HTTP handlers.
//! ChatService is generic over repository/provider traits, but AppState pins
//! it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use counsel_core::chat::service::ChatService;
use counsel_infra::config::{load_api_key, load_global_config, resolve_data_dir};
use counsel_infra::llm::OpenAiChatProvider;
use counsel_infra::sqlite::chat::SqliteConversationRepository;
use counsel_infra::sqlite::pool::DatabasePool;
use counsel_types::config::GlobalConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteConversationRepository, OpenAiChatProvider>;

/// Shared application state handed to every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: GlobalConfig,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, wire services.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = data_dir.unwrap_or_else(resolve_data_dir);

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_global_config(&data_dir).await;

        // Initialize database
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("counsel.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire the chat service with its repository and provider
        let api_key = load_api_key()?;
        let provider = OpenAiChatProvider::with_base_url(&api_key, config.api_base.as_deref());
        let repo = SqliteConversationRepository::new(db_pool.clone());
        let chat_service = ChatService::new(
            repo,
            provider,
            config.model.clone(),
            config.temperature,
            config.max_tokens,
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config,
            db_pool,
        })
    }
}
