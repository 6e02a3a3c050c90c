//! GameNerd — sports chat backend.
//!
//! Forwards a user's query to an OpenAI-compatible model, optionally asks for
//! one structured-output tool, strips links from the reply, and returns a
//! `{reply, ui_data}` envelope or streams the text over server-sent events.

pub mod agent;
pub mod config;
pub mod inference;
pub mod server;
pub mod tools;
pub mod types;
