//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pdf_chat::{AppState, ChatConfig, ChatMessage, ChatModel, Embedder, Error, Result};
use std::sync::Arc;
use tower::ServiceExt;

mod pdf;

pub use pdf::build_pdf;

pub const BOUNDARY: &str = "pdfchatboundary";

/// Letter-frequency embedder: deterministic and offline
pub struct FakeEmbedder;

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut v = vec![0.0f32; 26];
        for c in text.chars().flat_map(char::to_lowercase) {
            if c.is_ascii_lowercase() {
                v[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        // Keep the vector non-zero for texts without letters.
        v.push(1.0);
        Ok(v)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-embed"
    }
}

/// Replies with the question and how many messages it was shown
pub struct EchoModel;

#[async_trait]
impl ChatModel for EchoModel {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let question = messages
            .last()
            .map(|m| m.content.clone())
            .ok_or_else(|| Error::llm("no messages"))?;
        Ok(format!("echo: {} ({} messages)", question, messages.len()))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }
}

/// Configuration used by [`app`]
pub fn test_config() -> ChatConfig {
    let mut config = ChatConfig::default();
    config.chunking.chunk_size = 200;
    config.chunking.chunk_overlap = 40;
    config
}

/// Router backed by fake providers
pub fn app() -> Router {
    app_with(test_config())
}

/// Router over `config` backed by fake providers
pub fn app_with(config: ChatConfig) -> Router {
    let state = AppState::with_providers(config, Arc::new(FakeEmbedder), Arc::new(EchoModel)).unwrap();
    pdf_chat::build_router(state)
}

/// Send a request and decode the JSON body (Null when empty)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Multipart upload with one `files` part per (filename, bytes) and a plain
/// `note` field that carries no file
pub fn post_files(uri: &str, files: &[(&str, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    for (filename, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"files\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\nuploaded from tests\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Start a session and return its id
pub async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, post_empty("/api/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    body["session_id"].as_str().unwrap().to_string()
}
