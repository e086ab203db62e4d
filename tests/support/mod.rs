//! Mock Telegram Bot API for integration tests.
//!
//! Serves `sendMessage` and `getMe` on a random local port and records
//! every call so tests can assert on order and content.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "123456:TEST-TOKEN";

/// One recorded `sendMessage` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub bot_path: String,
    pub body: Value,
    pub received_at: Instant,
}

impl RecordedCall {
    pub fn chat_id(&self) -> &str {
        self.body["chat_id"].as_str().unwrap_or_default()
    }

    pub fn text(&self) -> &str {
        self.body["text"].as_str().unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct MockTelegramState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    failing_chat: Option<String>,
    status_only_failure: bool,
}

impl MockTelegramState {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn send_message(
    State(state): State<MockTelegramState>,
    Path(bot_path): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let chat_id = body["chat_id"].as_str().unwrap_or_default().to_string();
    let message_id = {
        let mut calls = state.calls.lock().unwrap();
        calls.push(RecordedCall {
            bot_path,
            body,
            received_at: Instant::now(),
        });
        calls.len()
    };

    if state.failing_chat.as_deref() == Some(chat_id.as_str()) {
        if state.status_only_failure {
            return (StatusCode::BAD_GATEWAY, "upstream unavailable".to_string()).into_response();
        }
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: chat not found"
            })),
        )
            .into_response();
    }

    Json(json!({"ok": true, "result": {"message_id": message_id}})).into_response()
}

async fn get_me(Path(bot_path): Path<String>) -> impl IntoResponse {
    if bot_path == format!("bot{TEST_TOKEN}") {
        Json(json!({"ok": true, "result": {"id": 123456, "is_bot": true}})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"ok": false, "error_code": 401, "description": "Unauthorized"})),
        )
            .into_response()
    }
}

async fn spawn(state: MockTelegramState) -> (String, MockTelegramState) {
    let app = Router::new()
        .route("/{bot_path}/sendMessage", post(send_message))
        .route("/{bot_path}/getMe", get(get_me))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://127.0.0.1:{port}"), state)
}

/// Mock API that accepts every message.
pub async fn spawn_mock_telegram() -> (String, MockTelegramState) {
    spawn(MockTelegramState::default()).await
}

/// Mock API that answers "chat not found" for one chat id.
pub async fn spawn_mock_telegram_failing_for(chat_id: &str) -> (String, MockTelegramState) {
    spawn(MockTelegramState {
        failing_chat: Some(chat_id.to_string()),
        ..Default::default()
    })
    .await
}

/// Mock API that answers 502 with a non-JSON body for one chat id.
pub async fn spawn_mock_telegram_bare_failure_for(chat_id: &str) -> (String, MockTelegramState) {
    spawn(MockTelegramState {
        failing_chat: Some(chat_id.to_string()),
        status_only_failure: true,
        ..Default::default()
    })
    .await
}
