//! Message context builder for upstream requests.

use crate::types::*;
use tracing::debug;

/// History turns forwarded with each query (the last three exchanges).
pub const HISTORY_WINDOW: usize = 6;

/// Build the full message list for a single-call request.
///
/// System instruction, then at most the last [`HISTORY_WINDOW`] history
/// turns in their original order, then the new user turn. Older turns are
/// dropped.
pub fn build_messages(system_prompt: &str, history: &[ChatMessage], query: &str) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    if start > 0 {
        debug!("Dropping {} old history turns", start);
    }

    let mut messages = Vec::with_capacity(history.len() - start + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend_from_slice(&history[start..]);
    messages.push(ChatMessage::user(query));
    messages
}

/// Build the two-turn message list for a streaming request.
pub fn build_stream_messages(system_prompt: &str, query: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(query)]
}
