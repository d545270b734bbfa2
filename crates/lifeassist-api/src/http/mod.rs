//! HTTP API layer for lifeassist.
//!
//! Axum-based JSON API with lenient request parsing, a plain-text streaming
//! chat route, and permissive CORS for a separately hosted UI.

pub mod extractors;
pub mod handlers;
pub mod router;
