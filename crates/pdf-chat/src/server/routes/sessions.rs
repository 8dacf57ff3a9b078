//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{SessionCreated, SessionSummary};

/// POST /api/sessions - Start a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions().create();
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

/// GET /api/sessions/:id - Session summary
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSummary>> {
    let ctx = state.sessions().lock(&id).await?;
    Ok(Json(ctx.summary()))
}

/// DELETE /api/sessions/:id - End a session and discard its state
pub async fn end_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.sessions().remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
