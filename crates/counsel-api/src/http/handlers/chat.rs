//! Chat turn HTTP handler.
//!
//! POST /chat
//!
//! One request runs one full turn: resolve or create the conversation,
//! assemble the prompt from persisted history, call the provider once, and
//! persist the turn atomically. The handler suspends on the provider call;
//! no retries, a failed call surfaces as a failed request.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::ClientAddr;
use crate::state::AppState;

/// Request body for a chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    /// Existing conversation to continue; if absent, a new one is created.
    #[serde(default)]
    pub conversation_id: Option<Uuid>,
}

/// Response body for a chat turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub conversation_id: Uuid,
}

/// POST /chat - Run one chat turn and return the assistant's reply.
pub async fn chat(
    State(state): State<AppState>,
    ClientAddr(client_addr): ClientAddr,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let question = body.question.trim();
    if question.is_empty() {
        return Err(AppError::Validation("question is required".to_string()));
    }

    let reply = state
        .chat_service
        .chat_turn(&client_addr, question, body.conversation_id)
        .await?;

    Ok(Json(ChatResponse {
        answer: reply.answer,
        conversation_id: reply.conversation_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_without_conversation_id() {
        let body: ChatRequest =
            serde_json::from_str(r#"{"question": "What is a tort?"}"#).unwrap();
        assert_eq!(body.question, "What is a tort?");
        assert!(body.conversation_id.is_none());
    }

    #[test]
    fn test_chat_request_with_conversation_id() {
        let id = Uuid::now_v7();
        let json = format!(r#"{{"question": "More?", "conversation_id": "{id}"}}"#);
        let body: ChatRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(body.conversation_id, Some(id));
    }

    #[test]
    fn test_chat_request_rejects_malformed_id() {
        let result: Result<ChatRequest, _> =
            serde_json::from_str(r#"{"question": "Q", "conversation_id": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_response_shape() {
        let resp = ChatResponse {
            answer: "A civil wrong.".to_string(),
            conversation_id: Uuid::now_v7(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("answer").is_some());
        assert!(json.get("conversation_id").is_some());
    }
}
