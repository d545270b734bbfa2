//! Chat request orchestration for lifeassist.
//!
//! `ChatService` combines the generation client with the history service
//! to answer a conversation, single-shot or streamed.

pub mod service;

pub use service::GREETING;
