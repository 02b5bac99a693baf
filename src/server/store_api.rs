use axum::{
    extract::{ Path, State },
    http::StatusCode,
    response::{ sse::{ Event, KeepAlive, Sse }, IntoResponse, Response },
    Json,
};
use chrono::Utc;
use futures::{ Stream, StreamExt };
use log::info;
use serde::Deserialize;
use serde_json::{ json, Value };
use tokio_stream::wrappers::WatchStream;

use crate::models::chat::{ ClipboardField, ClipboardRecord, Conversation, Message, Sender };
use crate::server::AppState;

pub async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn get_clipboard(State(state): State<AppState>) -> Json<ClipboardRecord> {
    Json(state.clipboard.get())
}

/// Debounced write: the record is committed once the debounce window
/// elapses without a newer edit. Last write wins.
pub async fn put_clipboard(
    State(state): State<AppState>,
    Json(record): Json<ClipboardRecord>
) -> StatusCode {
    state.clipboard_writer.lock().await.schedule(record);
    StatusCode::ACCEPTED
}

#[derive(Deserialize)]
pub struct ClearBody {
    pub field: ClipboardField,
}

/// Immediate write clearing one field while preserving the other; any
/// pending debounced edit is discarded.
pub async fn clear_clipboard(
    State(state): State<AppState>,
    Json(body): Json<ClearBody>
) -> Json<ClipboardRecord> {
    let mut record = state.clipboard.get();
    record.clear_field(body.field);
    state.clipboard_writer.lock().await.flush_now(record);
    Json(state.clipboard.get())
}

/// Live subscription: the current record first, then every committed
/// write, as server-sent events.
pub async fn watch_clipboard(
    State(state): State<AppState>
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.clipboard.subscribe()).map(|record| {
        Event::default().json_data(&record)
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Deserialize)]
pub struct CreateConversationBody {
    pub title: String,
}

pub async fn list_conversations(State(state): State<AppState>) -> Json<Vec<Conversation>> {
    Json(state.conversations.list().await)
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Json(body): Json<CreateConversationBody>
) -> (StatusCode, Json<Conversation>) {
    let conversation = state.conversations.create(&body.title).await;
    info!("Created conversation '{}' ({})", conversation.title, conversation.id);
    (StatusCode::CREATED, Json(conversation))
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>
) -> Response {
    if state.conversations.delete(&id).await {
        info!("Deleted conversation {}", id);
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found()
    }
}

pub async fn list_messages(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.conversations.messages(&id).await {
        Some(messages) => Json(messages).into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
pub struct AppendMessageBody {
    pub text: String,
    pub sender: Sender,
    #[serde(default)]
    pub placeholder: bool,
}

pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<AppendMessageBody>
) -> Response {
    let message = Message {
        text: body.text,
        sender: body.sender,
        timestamp: Utc::now().timestamp_millis(),
        placeholder: body.placeholder,
    };
    if state.conversations.append(&id, message.clone()).await {
        (StatusCode::CREATED, Json(message)).into_response()
    } else {
        not_found()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not_found" }))).into_response()
}
