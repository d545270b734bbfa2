//! Infrastructure layer for lifeassist.
//!
//! Contains implementations of the ports defined in `lifeassist-core`: the
//! JSON-file history store and the Gemini LLM provider. Also loads
//! configuration and credentials and resolves the data directory layout.

pub mod config;
pub mod filesystem;
pub mod history;
pub mod llm;
