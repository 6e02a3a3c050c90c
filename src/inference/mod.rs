//! Upstream chat-completion service.
//!
//! Handlers talk to the model through [`CompletionBackend`] so a single
//! long-lived client can be shared across requests and swapped out in tests.

pub mod client;
pub mod error;

pub use client::{HttpTimeouts, OpenAiClient};
pub use error::InferenceError;

use crate::tools::ToolDefinition;
use crate::types::{ChatMessage, Completion, StreamChunk};
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::Serialize;

/// Incremental chunks of a streamed completion, in arrival order.
///
/// Dropping the stream releases the underlying upstream connection.
pub type ChunkStream = BoxStream<'static, Result<StreamChunk, InferenceError>>;

/// Tool-choice policy sent alongside a tool catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides whether to call a tool.
    Auto,
}

/// One outbound request to the completion service.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
    pub temperature: f64,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            temperature,
        }
    }

    /// Attach a tool catalog with the given choice policy.
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>, choice: ToolChoice) -> Self {
        self.tools = tools;
        self.tool_choice = Some(choice);
        self
    }
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one request and wait for the full completion.
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, InferenceError>;

    /// Send one request with streaming enabled.
    async fn stream(&self, request: CompletionRequest) -> Result<ChunkStream, InferenceError>;
}
