//! End-to-end tests of the HTTP API with fake providers

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_health_ready_and_page() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");

    let (status, _) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("Chat with multiple PDFs"));
}

#[tokio::test]
async fn test_info_reports_models() {
    let app = app();
    let (status, body) = send(&app, get("/api/info")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "pdf-chat");
    assert_eq!(body["models"]["embedding"], "fake-embed");
    assert_eq!(body["models"]["chat"], "echo-1");
}

#[tokio::test]
async fn test_session_lifecycle() {
    let app = app();
    let id = create_session(&app).await;

    let (status, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], id.as_str());
    assert_eq!(body["indexed_chunks"], 0);
    assert_eq!(body["history_len"], 0);

    let (status, _) = send(&app, delete(&format!("/api/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "session_not_found");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();
    let uri = format!("/api/sessions/{}/chat", uuid::Uuid::new_v4());
    let (status, _) = send(&app, post_json(&uri, json!({ "question": "hi" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_before_process_is_conflict() {
    let app = app();
    let id = create_session(&app).await;

    let uri = format!("/api/sessions/{}/chat", id);
    let (status, body) = send(&app, post_json(&uri, json!({ "question": "What is inside?" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["type"], "no_documents");
}

#[tokio::test]
async fn test_process_then_chat() {
    let app = app();
    let id = create_session(&app).await;

    let files = [
        ("rust.pdf", build_pdf(&["Rust guarantees memory safety", "Ownership rules"])),
        ("tokio.pdf", build_pdf(&["Tokio is an async runtime"])),
    ];
    let (status, body) = send(&app, post_files(&format!("/api/sessions/{}/process", id), &files)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["documents"].as_array().unwrap().len(), 2);
    assert_eq!(body["documents"][0]["filename"], "rust.pdf");
    assert!(body["total_chunks"].as_u64().unwrap() >= 1);
    assert!(body["total_characters"].as_u64().unwrap() > 0);

    let uri = format!("/api/sessions/{}/chat", id);
    let (status, body) = send(&app, post_json(&uri, json!({ "question": "What is Tokio?" }))).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["answer"], "echo: What is Tokio? (2 messages)");
    assert_eq!(body["history_len"], 2);
    assert!(!body["sources"].as_array().unwrap().is_empty());

    // The follow-up sees the first exchange.
    let (_, body) = send(&app, post_json(&uri, json!({ "question": "And Rust?" }))).await;
    assert_eq!(body["answer"], "echo: And Rust? (4 messages)");

    let (status, body) = send(&app, get(&format!("/api/sessions/{}/history", id))).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(messages[0]["content"], "What is Tokio?");
    assert_eq!(messages[1]["role"], "assistant");
}

#[tokio::test]
async fn test_empty_question_rejected() {
    let app = app();
    let id = create_session(&app).await;
    let files = [("a.pdf", build_pdf(&["Some text"]))];
    send(&app, post_files(&format!("/api/sessions/{}/process", id), &files)).await;

    let uri = format!("/api/sessions/{}/chat", id);
    let (status, body) = send(&app, post_json(&uri, json!({ "question": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_process_without_files_keeps_previous_index() {
    let app = app();
    let id = create_session(&app).await;
    let process_uri = format!("/api/sessions/{}/process", id);

    let (status, _) = send(&app, post_files(&process_uri, &[])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let files = [("a.pdf", build_pdf(&["Indexed text"]))];
    let (status, _) = send(&app, post_files(&process_uri, &files)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, post_files(&process_uri, &[])).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["type"], "empty_index");

    let (_, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert!(body["indexed_chunks"].as_u64().unwrap() >= 1);
    assert_eq!(body["documents"][0]["filename"], "a.pdf");
}

#[tokio::test]
async fn test_malformed_pdf_is_bad_request() {
    let app = app();
    let id = create_session(&app).await;
    let files = [("broken.pdf", b"definitely not a pdf".to_vec())];

    let (status, body) = send(&app, post_files(&format!("/api/sessions/{}/process", id), &files)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "parse_error");
}

#[tokio::test]
async fn test_reprocess_resets_conversation() {
    let app = app();
    let id = create_session(&app).await;
    let process_uri = format!("/api/sessions/{}/process", id);
    let chat_uri = format!("/api/sessions/{}/chat", id);

    send(&app, post_files(&process_uri, &[("one.pdf", build_pdf(&["First upload"]))])).await;
    send(&app, post_json(&chat_uri, json!({ "question": "first?" }))).await;

    let (status, _) = send(&app, post_files(&process_uri, &[("two.pdf", build_pdf(&["Second upload"]))])).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(body["history_len"], 0);
    assert_eq!(body["documents"][0]["filename"], "two.pdf");
}

#[tokio::test]
async fn test_clear_history_keeps_index() {
    let app = app();
    let id = create_session(&app).await;
    let chat_uri = format!("/api/sessions/{}/chat", id);

    send(
        &app,
        post_files(&format!("/api/sessions/{}/process", id), &[("a.pdf", build_pdf(&["Text"]))]),
    )
    .await;
    send(&app, post_json(&chat_uri, json!({ "question": "q?" }))).await;

    let (status, _) = send(&app, delete(&format!("/api/sessions/{}/history", id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, post_json(&chat_uri, json!({ "question": "again?" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["history_len"], 2);
}

#[tokio::test]
async fn test_sessions_do_not_share_state() {
    let app = app();
    let a = create_session(&app).await;
    let b = create_session(&app).await;

    send(
        &app,
        post_files(&format!("/api/sessions/{}/process", a), &[("a.pdf", build_pdf(&["Only in A"]))]),
    )
    .await;

    let (status, _) = send(
        &app,
        post_json(&format!("/api/sessions/{}/chat", b), json!({ "question": "anything?" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_pdf_without_visible_text_is_empty_index() {
    let app = app();
    let id = create_session(&app).await;
    let files = [("blank.pdf", build_pdf(&["", ""]))];

    let (status, body) = send(&app, post_files(&format!("/api/sessions/{}/process", id), &files)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", body);
    assert_eq!(body["error"]["type"], "empty_index");

    let (_, body) = send(&app, get(&format!("/api/sessions/{}", id))).await;
    assert_eq!(body["indexed_chunks"], 0);
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let mut config = test_config();
    config.server.max_upload_size = 1024;
    let app = app_with(config);
    let id = create_session(&app).await;
    let files = [("big.pdf", vec![b'x'; 10 * 1024])];

    let (status, body) = send(&app, post_files(&format!("/api/sessions/{}/process", id), &files)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE, "{}", body);
    assert_eq!(body["error"]["type"], "payload_too_large");
}
