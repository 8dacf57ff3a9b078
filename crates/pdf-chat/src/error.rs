//! Error types for the PDF chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for pdf-chat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF could not be opened or read
    #[error("Failed to parse PDF '{filename}': {message}")]
    PdfParse { filename: String, message: String },

    /// Index build was attempted with no chunks
    #[error("No text could be indexed: the uploaded documents produced no chunks")]
    EmptyIndex,

    /// Chat attempted before any documents were processed
    #[error("No documents have been processed for this session")]
    NoDocumentsProcessed,

    /// Session does not exist (never created, ended, or evicted)
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upload exceeds the configured body limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Provider credential is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a PDF parse error
    pub fn pdf_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PdfParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable type for this error
    pub fn status_and_type(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::PdfParse { .. } => (StatusCode::BAD_REQUEST, "parse_error"),
            Error::EmptyIndex => (StatusCode::UNPROCESSABLE_ENTITY, "empty_index"),
            Error::NoDocumentsProcessed => (StatusCode::CONFLICT, "no_documents"),
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            Error::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            Error::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            Error::MissingCredential(_) => (StatusCode::SERVICE_UNAVAILABLE, "missing_credential"),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Json(_) => (StatusCode::BAD_REQUEST, "json_error"),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "http_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.status_and_type();

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
