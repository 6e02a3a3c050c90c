//! Single-call query handler.
//!
//! One upstream round trip per query: the model gathers data, writes the
//! reply and (optionally) fills in one structured-output tool, all at once.

use crate::agent::context::build_messages;
use crate::agent::sanitize::ReplyFilter;
use crate::agent::system_prompt::query_system_prompt;
use crate::inference::{CompletionBackend, CompletionRequest, InferenceError, ToolChoice};
use crate::tools::{component_type_for, tool_catalog};
use crate::types::*;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const FALLBACK_TOOL_REPLY: &str = "Certainly! Here is the information you requested.";
const FALLBACK_TEXT_REPLY: &str =
    "I've processed your request, but I don't have specific data to show right now.";
const FALLBACK_PARSE_REPLY: &str =
    "I tried to get some structured data, but there was an issue formatting it.";

/// Per-deployment settings for [`QueryHandler`].
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub model: String,
    pub temperature: f64,
    /// Attach the tool catalog and let the model pick at most one tool.
    pub tool_catalog_enabled: bool,
}

/// Answers one query with one upstream call and returns a
/// [`ResponseEnvelope`].
pub struct QueryHandler {
    backend: Arc<dyn CompletionBackend>,
    filter: Arc<dyn ReplyFilter>,
    options: QueryOptions,
    system_prompt: String,
}

impl QueryHandler {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        filter: Arc<dyn ReplyFilter>,
        options: QueryOptions,
    ) -> Self {
        let system_prompt = query_system_prompt(options.tool_catalog_enabled);
        Self {
            backend,
            filter,
            options,
            system_prompt,
        }
    }

    /// Process a query against recent history. Never fails: every upstream
    /// problem is folded into the returned envelope.
    pub async fn process(&self, query: &str, history: &[ChatMessage]) -> ResponseEnvelope {
        info!(
            "Processing query ({} history turns, tools {}): '{}'",
            history.len(),
            if self.options.tool_catalog_enabled { "on" } else { "off" },
            preview(query)
        );

        match self.complete(query, history).await {
            Ok(completion) => self.shape(completion),
            Err(e) => {
                error!("Single-call query failed: {} ({})", e, e.kind());
                apology(&e)
            }
        }
    }

    async fn complete(
        &self,
        query: &str,
        history: &[ChatMessage],
    ) -> Result<Completion, InferenceError> {
        let messages = build_messages(&self.system_prompt, history, query);
        let mut request =
            CompletionRequest::new(&self.options.model, messages, self.options.temperature);
        if self.options.tool_catalog_enabled {
            request = request.with_tools(tool_catalog(), ToolChoice::Auto);
        }
        self.backend.complete(request).await
    }

    /// Turn a completion into an envelope.
    fn shape(&self, completion: Completion) -> ResponseEnvelope {
        let usage = &completion.usage;
        debug!(
            "Token usage: {} prompt + {} completion = {} total",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );

        let reply = completion
            .content
            .as_deref()
            .map(|text| self.filter.apply(text))
            .unwrap_or_default();

        // Tool calls are ignored outright in text-only deployments.
        let tool_calls = if self.options.tool_catalog_enabled {
            completion.tool_calls
        } else {
            Vec::new()
        };

        if tool_calls.len() > 1 {
            debug!(
                "Model returned {} tool calls; honoring only the first",
                tool_calls.len()
            );
        }

        let Some(call) = tool_calls.into_iter().next() else {
            info!("No tool call made; text-only reply");
            return ResponseEnvelope {
                reply: non_empty_or(reply, FALLBACK_TEXT_REPLY),
                ui_data: UiData::generic(),
            };
        };

        let args: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                warn!(
                    "Could not parse arguments for tool '{}': {} (raw: {})",
                    call.name, e, call.arguments
                );
                return ResponseEnvelope {
                    reply: non_empty_or(reply, FALLBACK_PARSE_REPLY),
                    ui_data: UiData::error(format!("Failed to parse UI data for {}.", call.name)),
                };
            }
        };

        let component_type = component_type_for(&call.name);
        info!("UI component generated: '{}'", component_type);

        ResponseEnvelope {
            reply: non_empty_or(reply, FALLBACK_TOOL_REPLY),
            ui_data: UiData {
                component_type: component_type.to_string(),
                data: args,
            },
        }
    }
}

fn non_empty_or(reply: String, fallback: &str) -> String {
    if reply.is_empty() {
        fallback.to_string()
    } else {
        reply
    }
}

fn apology(err: &InferenceError) -> ResponseEnvelope {
    ResponseEnvelope {
        reply: format!(
            "I encountered a problem processing your request. Please try again. ({})",
            err.kind()
        ),
        ui_data: UiData::error(format!("Internal server error: {} - {}", err.kind(), err)),
    }
}

/// First 60 characters of a query, for log lines.
pub(crate) fn preview(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(60).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
