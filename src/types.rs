//! Shared types used across the GameNerd backend.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Component tag used when no structured widget applies.
pub const DEFAULT_COMPONENT_TYPE: &str = "generic_text";

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// A chat message in the multi-turn conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inference types
// ---------------------------------------------------------------------------

/// A tool call request from the model.
///
/// `arguments` is kept exactly as the upstream sent it; parsing happens in the
/// query handler so malformed payloads can degrade gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// A single (non-streaming) completion result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Completion {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub usage: TokenUsage,
}

/// Token usage from an inference call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One incremental unit of a streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamChunk {
    pub content: Option<String>,
}

impl StreamChunk {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }

    pub fn empty() -> Self {
        Self { content: None }
    }
}

// ---------------------------------------------------------------------------
// Response envelope
// ---------------------------------------------------------------------------

/// The uniform `{reply, ui_data}` shape returned for every single-call outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub reply: String,
    pub ui_data: UiData,
}

/// Structured payload plus the widget tag a client should render it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiData {
    pub component_type: String,
    pub data: Value,
}

impl UiData {
    /// `{component_type: "generic_text", data: {}}`.
    pub fn generic() -> Self {
        Self {
            component_type: DEFAULT_COMPONENT_TYPE.into(),
            data: json!({}),
        }
    }

    /// `{component_type: "generic_text", data: {error: message}}`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            component_type: DEFAULT_COMPONENT_TYPE.into(),
            data: json!({ "error": message.into() }),
        }
    }
}

impl Default for UiData {
    fn default() -> Self {
        Self::generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn envelope_serializes_with_client_field_names() {
        let envelope = ResponseEnvelope {
            reply: "hi".into(),
            ui_data: UiData::error("boom"),
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "reply": "hi",
                "ui_data": {"component_type": "generic_text", "data": {"error": "boom"}}
            })
        );
    }

    #[test]
    fn chat_roles_round_trip_lowercase() {
        let msg: ChatMessage =
            serde_json::from_value(json!({"role": "assistant", "content": "x"})).unwrap();
        assert_eq!(msg, ChatMessage::assistant("x"));
        assert_eq!(ChatRole::System.to_string(), "system");
    }
}
