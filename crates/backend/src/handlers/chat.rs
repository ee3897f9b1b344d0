use crate::assistant::Assistant;
use axum::{extract::State, http::StatusCode, Json};
use contracts::chat::{ChatReply, ChatRequest};
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct ChatState {
    /// `None` when no LLM API key is configured
    pub assistant: Option<Arc<Assistant>>,
}

/// POST /chat
pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<Value>)> {
    let Some(assistant) = state.assistant.as_ref() else {
        tracing::error!("Chat request rejected: LLM API key is not configured");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "LLM API key is not configured" })),
        ));
    };

    let message = request.message.trim();
    if message.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Message must not be empty" })),
        ));
    }

    Ok(Json(assistant.process_message(message).await))
}
