//! API routes for the chat server

pub mod chat;
pub mod process;
pub mod sessions;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/sessions", post(sessions::create_session))
        .route(
            "/sessions/:id",
            get(sessions::get_session).delete(sessions::end_session),
        )
        // Processing - with larger body limit for PDF uploads
        .route(
            "/sessions/:id/process",
            post(process::process_documents).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Conversation
        .route("/sessions/:id/chat", post(chat::ask_question))
        .route(
            "/sessions/:id/history",
            get(chat::get_history).delete(chat::clear_history),
        )
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    Json(serde_json::json!({
        "name": "pdf-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Chat with multiple PDFs using retrieval-augmented generation",
        "endpoints": {
            "POST /api/sessions": "Start a session",
            "GET /api/sessions/:id": "Session summary",
            "DELETE /api/sessions/:id": "End a session",
            "POST /api/sessions/:id/process": "Upload PDFs and rebuild the session index",
            "POST /api/sessions/:id/chat": "Ask a question about the processed PDFs",
            "GET /api/sessions/:id/history": "Conversation so far",
            "DELETE /api/sessions/:id/history": "Clear the conversation"
        },
        "provider": format!("{:?}", config.provider).to_lowercase(),
        "models": {
            "embedding": state.embedder().model(),
            "chat": state.chat_model().model()
        },
        "chunking": {
            "separator": config.chunking.separator,
            "chunk_size": config.chunking.chunk_size,
            "chunk_overlap": config.chunking.chunk_overlap
        },
        "active_sessions": state.sessions().len()
    }))
}
