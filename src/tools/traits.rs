//! Tool definition shape exposed to the inference model.

use serde::{Deserialize, Serialize};

/// Definition of a structured-output tool exposed to the inference model.
///
/// The parameter schema is advisory input for the model; nothing here
/// validates arguments against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, parameters: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
