use axum::{
    routing::{get, post},
    Router,
};
use contracts::chat::CHAT_PATH;
use tower_http::services::ServeDir;

use crate::handlers::chat::{self, ChatState};

/// All application routes; anything unmatched is served from the frontend bundle
pub fn configure_routes(state: ChatState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(CHAT_PATH, post(chat::chat))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
}
