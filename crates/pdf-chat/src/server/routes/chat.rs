//! Conversation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::{ChainOptions, ConversationChain};
use crate::providers::IndexRetriever;
use crate::server::state::AppState;
use crate::types::{ChatAnswer, ChatRequest, HistoryResponse};

/// POST /api/sessions/:id/chat - Answer a question from the session's
/// documents and conversation
pub async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatAnswer>> {
    let mut ctx = state.sessions().lock(&id).await?;
    let index = ctx.index.clone().ok_or(Error::NoDocumentsProcessed)?;

    let retrieval = &state.config().retrieval;
    let retriever = IndexRetriever::new(index, Arc::clone(state.embedder()))
        .with_min_similarity(retrieval.min_similarity);
    let options = ChainOptions {
        top_k: request.top_k.filter(|&k| k > 0).unwrap_or(retrieval.top_k),
    };
    let chain = ConversationChain::new(Arc::new(retriever), Arc::clone(state.chat_model()), options);

    tracing::info!("Session {}: question ({} chars)", id, request.question.chars().count());
    tracing::debug!("Session {}: question: {}", id, request.question);
    let answer = chain.ask(&mut ctx.memory, &request.question).await?;

    Ok(Json(answer))
}

/// GET /api/sessions/:id/history - Conversation so far
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryResponse>> {
    let ctx = state.sessions().lock(&id).await?;
    Ok(Json(HistoryResponse {
        session_id: ctx.id,
        messages: ctx.memory.messages().to_vec(),
    }))
}

/// DELETE /api/sessions/:id/history - Forget the conversation, keep the index
pub async fn clear_history(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let mut ctx = state.sessions().lock(&id).await?;
    ctx.memory.clear();
    Ok(StatusCode::NO_CONTENT)
}
