//! LLM request/response types for lifeassist.
//!
//! These types model the provider-agnostic data shapes exchanged with a
//! text-generation backend: completion requests, streaming events, usage
//! tracking, and error handling.

use serde::{Deserialize, Serialize};

use crate::chat::ChatTurn;

/// Request to an LLM provider for a completion.
///
/// `messages` is the full conversation in order; the last entry is the live
/// message the provider answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model override. Empty means the provider's configured model.
    #[serde(default)]
    pub model: String,
    pub messages: Vec<ChatTurn>,
}

impl CompletionRequest {
    /// A single-turn request carrying one user prompt.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            model: String::new(),
            messages: vec![ChatTurn::user(prompt)],
        }
    }
}

/// Response from an LLM provider for a non-streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    pub usage: Usage,
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Events emitted during a streaming LLM response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A delta of generated text.
    TextDelta { text: String },

    /// Token usage information.
    Usage(Usage),

    /// The stream has completed.
    Done,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
