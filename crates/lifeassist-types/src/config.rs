//! Configuration types for lifeassist.
//!
//! `AppConfig` represents the top-level `config.toml` that controls the
//! HTTP bind address, the text-generation model, and history retention.
//! The API credential is deliberately not part of this file; it comes from
//! the process environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.lifeassist/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Text-generation provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Provider API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional whole-request timeout. Unset means no server-side timeout.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Per-session history retention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Most recent turns kept per session on save. `0` keeps everything.
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

fn default_max_turns() -> usize {
    500
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}
