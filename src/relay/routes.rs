//! HTTP endpoints for quiz submissions.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::service::SubmissionRelay;
use crate::report::Submission;

/// Permissive CORS set attached to every submit response.
const CORS_HEADERS: [(header::HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"),
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_METHODS,
        "GET,OPTIONS,PATCH,DELETE,POST,PUT",
    ),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version",
    ),
];

const CONFIG_ERROR: &str = "Server configuration error: Missing Telegram credentials";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct RelayState {
    /// `None` when credentials were incomplete at startup.
    pub relay: Option<Arc<SubmissionRelay>>,
}

/// Build the submit and health routes.
pub fn relay_routes(relay: Option<Arc<SubmissionRelay>>) -> Router {
    let state = RelayState { relay };

    let submit_route = post(submit)
        .options(preflight)
        .fallback(method_not_allowed)
        .layer(middleware::map_response(with_cors_headers));

    Router::new()
        .route("/api/submit", submit_route)
        .route("/health", get(health))
        .with_state(state)
}

async fn with_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

// ── Submit ──────────────────────────────────────────────────────────────

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({"error": "Method not allowed"})),
    )
}

/// POST /api/submit
///
/// Relays the submission to both chats. The body is parsed by hand so a
/// malformed payload still gets a JSON error body.
async fn submit(State(state): State<RelayState>, body: Bytes) -> Response {
    let Some(relay) = state.relay.as_ref() else {
        error!("Submission rejected: Telegram credentials are not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": CONFIG_ERROR})),
        )
            .into_response();
    };

    let submission: Submission = match serde_json::from_slice(&body) {
        Ok(submission) => submission,
        Err(e) => {
            warn!(error = %e, "Rejected malformed submission body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": format!("Invalid submission: {e}"),
                })),
            )
                .into_response();
        }
    };

    let submission_id = Uuid::new_v4();
    info!(
        %submission_id,
        student = %submission.student_name,
        score = submission.score,
        answers = submission.answers.len(),
        "Submission received"
    );

    let outcome = relay
        .relay(&submission)
        .instrument(info_span!("relay", %submission_id))
        .await;

    match outcome {
        Ok(()) => {
            info!(%submission_id, "Submission relayed");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": "Results submitted successfully",
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(%submission_id, error = %e, "Failed to relay submission");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": format!("Failed to submit results: {e}"),
                })),
            )
                .into_response()
        }
    }
}

// ── Health ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HealthParams {
    #[serde(default)]
    deep: bool,
}

/// GET /health
///
/// With `?deep=true` the bot token is also checked against the API.
async fn health(
    State(state): State<RelayState>,
    Query(params): Query<HealthParams>,
) -> impl IntoResponse {
    let configured = state.relay.is_some();
    let mut body = json!({
        "status": "ok",
        "service": "quiz-relay",
        "configured": configured,
    });

    if params.deep {
        let telegram = match state.relay.as_ref() {
            Some(relay) => match relay.channel().health_check().await {
                Ok(()) => "ok".to_string(),
                Err(e) => {
                    warn!(error = %e, "Channel health check failed");
                    e.to_string()
                }
            },
            None => "unconfigured".to_string(),
        };
        body["telegram"] = json!(telegram);
    }

    Json(body)
}
