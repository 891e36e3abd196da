//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - GET  /conversations                - List conversations for the caller
//! - POST /conversations                - Create a conversation
//! - GET  /conversations/{id}/messages  - List a conversation's messages

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use counsel_types::chat::{Conversation, Message};

use crate::http::error::AppError;
use crate::http::extractors::ClientAddr;
use crate::state::AppState;

/// Request body for explicit conversation creation.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid conversation id: {s}")))
}

/// GET /conversations - List the caller's conversations, most recent first.
pub async fn list_conversations(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state.chat_service.list_conversations(&client_addr).await?;
    Ok(Json(conversations))
}

/// POST /conversations - Create a conversation owned by the caller.
pub async fn create_conversation(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
    Json(body): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let title = body.title.filter(|t| !t.trim().is_empty());
    let conversation = state
        .chat_service
        .create_conversation(&client_addr, title)
        .await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /conversations/{id}/messages - Ordered messages of an owned conversation.
///
/// A nonexistent or foreign-owned id yields 404, never an empty list.
pub async fn list_messages(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
    Path(conversation_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let id = parse_uuid(&conversation_id)?;
    let messages = state.chat_service.get_messages(&client_addr, &id).await?;
    Ok(Json(messages))
}
