//! Chat transport: one request type, `POST /chat`.

use crate::shared::api_utils::api_url;
use contracts::chat::{ChatReply, ChatRequest, ResponseEnvelope, CHAT_PATH};
use gloo_net::http::Request;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: HTTP {0}")]
    Status(u16),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Send one user message and decode the server's envelope
pub async fn send_message(message: &str) -> Result<ResponseEnvelope, TransportError> {
    let url = api_url(CHAT_PATH);

    let response = Request::post(&url)
        .json(&ChatRequest::new(message))
        .map_err(|e| TransportError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(TransportError::Status(response.status()));
    }

    let text = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    decode_reply(&text)
}

/// Decode a reply body. Anything but `{ "response": envelope, ... }` is a
/// protocol violation.
pub fn decode_reply(body: &str) -> Result<ResponseEnvelope, TransportError> {
    let reply: ChatReply =
        serde_json::from_str(body).map_err(|e| TransportError::Decode(e.to_string()))?;
    if let Some(tokens) = reply.total_tokens {
        log::debug!("Assistant total tokens: {}", tokens);
    }
    Ok(reply.response)
}
