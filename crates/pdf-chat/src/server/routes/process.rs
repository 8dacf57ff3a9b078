//! Process action: upload, extract, chunk and index

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::retrieval::VectorIndex;
use crate::server::state::AppState;
use crate::types::{ProcessResponse, UploadedDocument};

/// POST /api/sessions/:id/process - Replace the session's index with one
/// built from the uploaded PDFs
///
/// On failure the session keeps its previous index and conversation.
pub async fn process_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ProcessResponse>> {
    let start = Instant::now();
    let mut ctx = state.sessions().lock(&id).await?;
    let max_upload_size = state.config().server.max_upload_size;

    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_upload_size))?
    {
        // Plain form fields carry no filename and are not documents.
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_upload_size))?;

        tracing::info!("Received file: {} ({} bytes)", filename, data.len());
        uploads.push(UploadedDocument::new(filename, data));
    }

    tracing::info!("Session {}: processing {} uploaded files", id, uploads.len());

    // PDF parsing is CPU-bound.
    let pipeline = Arc::clone(state.pipeline());
    let output = tokio::task::spawn_blocking(move || pipeline.ingest(&uploads))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    let total_characters = output.extraction.raw.char_len();
    let total_chunks = output.chunks.len();

    let index = VectorIndex::build_with_sources(
        output.chunks,
        &output.extraction.raw,
        state.embedder().as_ref(),
        state.config().llm.embed_batch_size,
    )
    .await?;

    let documents = output.extraction.documents;
    ctx.replace_index(index, documents.clone());

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Session {}: indexed {} chunks from {} characters in {}ms",
        id,
        total_chunks,
        total_characters,
        processing_time_ms
    );

    Ok(Json(ProcessResponse {
        documents,
        total_characters,
        total_chunks,
        processing_time_ms,
    }))
}

/// Map a multipart read failure, keeping the body-limit case distinct
fn multipart_error(err: MultipartError, max_upload_size: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(format!("uploads are limited to {} bytes", max_upload_size))
    } else {
        Error::InvalidRequest(format!("Failed to read multipart upload: {}", err.body_text()))
    }
}
