//! Configuration schema for gamenerd.toml.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::inference::HttpTimeouts;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameNerdConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Base URL of the OpenAI-compatible API.
    pub api_base_url: String,

    /// Model for single-call queries.
    pub model: String,

    /// Model for streamed queries.
    pub stream_model: String,

    /// Sampling temperature; kept low for factual, schema-shaped output.
    pub temperature: f64,

    /// Attach the structured-output tool catalog to single-call queries.
    pub tool_catalog_enabled: bool,

    /// Total timeout per upstream call, in seconds.
    pub request_timeout_secs: u64,

    /// Connection timeout per upstream call, in seconds.
    pub connect_timeout_secs: u64,

    /// HTML page served at `/`.
    pub index_html: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,
}

impl Default for GameNerdConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8000".into(),
            api_base_url: "https://api.openai.com".into(),
            model: "gpt-4o-search-preview".into(),
            stream_model: "gpt-4o".into(),
            temperature: 0.2,
            tool_catalog_enabled: true,
            request_timeout_secs: 180,
            connect_timeout_secs: 15,
            index_html: "app/static/htmlsim.html".into(),
            log_level: "info".into(),
        }
    }
}

impl GameNerdConfig {
    /// Resolve a path that may contain `~` to an absolute path.
    pub fn resolve_path(&self, path: &str) -> String {
        shellexpand::tilde(path).into_owned()
    }

    /// Resolved index page path.
    pub fn resolved_index_html(&self) -> String {
        self.resolve_path(&self.index_html)
    }

    pub fn timeouts(&self) -> HttpTimeouts {
        HttpTimeouts {
            request: Duration::from_secs(self.request_timeout_secs),
            connect: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}
