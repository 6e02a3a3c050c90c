use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;
use tracing::{info, warn};

use super::{ApiError, AppState};
use crate::agent::query::preview;
use crate::agent::Fragment;
use crate::types::{ChatMessage, ResponseEnvelope};

fn default_user_id() -> String {
    "default_user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ChatStreamRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    pub query: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Blank queries are rejected; accepted ones are forwarded as received.
fn validate_query(query: &str) -> Result<(), ApiError> {
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest("Query cannot be empty".into()));
    }
    Ok(())
}

pub(super) async fn health() -> impl IntoResponse {
    StatusCode::OK
}

pub(super) async fn index(State(st): State<AppState>) -> Result<Html<String>, ApiError> {
    match tokio::fs::read_to_string(&st.index_html).await {
        Ok(html) => Ok(Html(html)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Index page missing at {}", st.index_html.display());
            Err(ApiError::NotFound("Index HTML not found.".into()))
        }
        Err(e) => Err(ApiError::Internal(format!("failed to read index page: {e}"))),
    }
}

pub(super) async fn chat(
    State(st): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_query(&req.query)?;
    info!(
        "/chat called by user: {}, query: '{}'",
        req.user_id,
        preview(&req.query)
    );

    Ok(Json(st.query.process(&req.query, &req.history).await))
}

pub(super) async fn chat_stream(
    State(st): State<AppState>,
    payload: Result<Json<ChatStreamRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_query(&req.query)?;
    info!(
        "/chat-stream called by user: {}, query: '{}'",
        req.user_id,
        preview(&req.query)
    );

    let events = st
        .stream
        .stream(&req.query)
        .map(|fragment| Ok::<_, Infallible>(fragment_event(&fragment)));

    Ok(Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response())
}

/// One SSE event per fragment. Diagnostics go out as
/// `{"error": true, "message": ...}` so clients can tell them from text.
pub fn fragment_event(fragment: &Fragment) -> Event {
    let data = match fragment {
        Fragment::Text(text) => text.replace("\r\n", "\n").replace('\r', "\n"),
        Fragment::Diagnostic(message) => {
            serde_json::json!({ "error": true, "message": message }).to_string()
        }
    };
    Event::default().data(data)
}
