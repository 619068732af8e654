//! Completion-service client for the question-answering pipeline.
//!
//! Blocking reqwest client (no Tokio runtime required) speaking the
//! OpenAI-compatible chat-completions wire format, plus settings-file
//! and environment-based configuration.

pub mod client;
pub mod config;

pub use client::{CompletionClient, CompletionError};
pub use config::{LlmSettings, ResolvedLlmConfig};
