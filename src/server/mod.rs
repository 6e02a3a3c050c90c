//! HTTP surface: the streaming endpoint, the single-call endpoint and the
//! static index page.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{fragment_event, ChatRequest, ChatStreamRequest};

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::agent::{LinkStripper, QueryHandler, QueryOptions, StreamHandler, StreamOptions};
use crate::config::GameNerdConfig;
use crate::inference::CompletionBackend;

pub const INDEX_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const CHAT_PATH: &str = "/chat";
pub const CHAT_STREAM_PATH: &str = "/chat-stream";

/// Per-process handler state, built once and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub query: Arc<QueryHandler>,
    pub stream: Arc<StreamHandler>,
    pub index_html: PathBuf,
}

impl AppState {
    /// Wire both handlers to one shared backend.
    pub fn new(config: &GameNerdConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        let query = QueryHandler::new(
            Arc::clone(&backend),
            Arc::new(LinkStripper),
            QueryOptions {
                model: config.model.clone(),
                temperature: config.temperature,
                tool_catalog_enabled: config.tool_catalog_enabled,
            },
        );
        let stream = StreamHandler::new(
            backend,
            StreamOptions {
                model: config.stream_model.clone(),
                temperature: config.temperature,
            },
        );

        Self {
            query: Arc::new(query),
            stream: Arc::new(stream),
            index_html: PathBuf::from(config.resolved_index_html()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(INDEX_PATH, get(routes::index))
        .route(HEALTH_PATH, get(routes::health))
        .route(CHAT_PATH, post(routes::chat))
        .route(CHAT_STREAM_PATH, post(routes::chat_stream))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves.
pub async fn serve<F>(bind_addr: &str, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
