use std::time::Duration;

use axum::body::Body;
use axum::http::{ Method, Request, StatusCode };
use clap::Parser;
use serde_json::{ json, Value };
use tokio::time::sleep;
use tower::util::ServiceExt;

use syncboard::cli::Args;
use syncboard::server::{ build_router, build_state, AppState };

const DEBOUNCE_MS: u64 = 25;

fn state() -> AppState {
    state_with_extra_args(&["--debounce-ms", "25"])
}

fn state_with_extra_args(extra: &[&str]) -> AppState {
    let mut argv = vec!["syncboard", "--chat-llm-type", "gemini", "--chat-api-key", "secret"];
    argv.extend_from_slice(extra);
    let args = Args::parse_from(argv);
    build_state(&args).unwrap()
}

async fn send(
    state: &AppState,
    method: Method,
    path: &str,
    body: Option<Value>,
    api_key: Option<&str>
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = build_router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn wait_past_debounce() {
    sleep(Duration::from_millis(DEBOUNCE_MS * 8)).await;
}

#[tokio::test]
async fn healthz_answers_ok() {
    let (status, body) = send(&state(), Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn clipboard_edits_commit_after_the_debounce_window() {
    let state = state();

    let (status, _) = send(
        &state,
        Method::PUT,
        "/clipboard",
        Some(json!({ "laptop": "copied text", "phone": "" })),
        None
    ).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // Not yet visible: the debounce window has not elapsed.
    let (_, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(body["laptop"], "");

    wait_past_debounce().await;
    let (_, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(body["laptop"], "copied text");
}

#[tokio::test]
async fn only_the_latest_of_two_quick_edits_survives() {
    let state = state();

    send(&state, Method::PUT, "/clipboard", Some(json!({ "laptop": "first", "phone": "" })), None).await;
    send(&state, Method::PUT, "/clipboard", Some(json!({ "laptop": "second", "phone": "" })), None).await;
    wait_past_debounce().await;

    let (_, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(body["laptop"], "second");
}

#[tokio::test]
async fn clear_is_immediate_and_preserves_the_other_field() {
    let state = state();

    send(
        &state,
        Method::PUT,
        "/clipboard",
        Some(json!({ "laptop": "laptop text", "phone": "phone text" })),
        None
    ).await;
    wait_past_debounce().await;

    let (status, body) = send(
        &state,
        Method::POST,
        "/clipboard/clear",
        Some(json!({ "field": "laptop" })),
        None
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "laptop": "", "phone": "phone text" }));

    // Immediate: visible without waiting out any debounce window.
    let (_, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(body, json!({ "laptop": "", "phone": "phone text" }));
}

#[tokio::test]
async fn clear_discards_a_pending_debounced_edit() {
    // A window wide enough that the clear always lands first.
    let state = state_with_extra_args(&["--debounce-ms", "300"]);

    // Schedule an edit, then clear before the window elapses.
    send(&state, Method::PUT, "/clipboard", Some(json!({ "laptop": "edited", "phone": "b" })), None).await;
    send(&state, Method::POST, "/clipboard/clear", Some(json!({ "field": "phone" })), None).await;

    // Even after the window would have elapsed, the edit stays discarded.
    sleep(Duration::from_millis(800)).await;
    let (_, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(body, json!({ "laptop": "", "phone": "" }));
}

#[tokio::test]
async fn conversation_lifecycle_create_append_read_delete() {
    let state = state();

    let (status, conversation) = send(
        &state,
        Method::POST,
        "/conversations",
        Some(json!({ "title": "morning notes" })),
        None
    ).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(conversation["title"], "morning notes");
    let id = conversation["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&state, Method::GET, "/conversations", None, None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let messages_path = format!("/conversations/{}/messages", id);
    send(
        &state,
        Method::POST,
        &messages_path,
        Some(json!({ "text": "hello", "sender": "user" })),
        None
    ).await;
    send(
        &state,
        Method::POST,
        &messages_path,
        Some(json!({ "text": "...", "sender": "assistant", "placeholder": true })),
        None
    ).await;
    send(
        &state,
        Method::POST,
        &messages_path,
        Some(json!({ "text": "hi there", "sender": "assistant" })),
        None
    ).await;

    let (status, messages) = send(&state, Method::GET, &messages_path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let texts: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["hello", "hi there"]);

    let (status, _) = send(
        &state,
        Method::DELETE,
        &format!("/conversations/{}", id),
        None,
        None
    ).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&state, Method::GET, &messages_path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn unknown_conversation_ids_return_not_found() {
    let state = state();
    let (status, body) = send(
        &state,
        Method::GET,
        "/conversations/nope/messages",
        None,
        None
    ).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn the_api_key_gate_rejects_unauthenticated_requests() {
    let state = state_with_extra_args(&["--server-api-key", "letmein"]);

    let (status, body) = send(&state, Method::GET, "/clipboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = send(&state, Method::GET, "/clipboard", None, Some("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&state, Method::GET, "/clipboard", None, Some("letmein")).await;
    assert_eq!(status, StatusCode::OK);

    // The health probe stays open.
    let (status, _) = send(&state, Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
