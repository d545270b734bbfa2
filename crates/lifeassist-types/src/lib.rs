//! Shared domain types for lifeassist.
//!
//! Chat turns, session identifiers, provider-agnostic LLM shapes,
//! configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
