//! Business logic and port definitions for lifeassist.
//!
//! This crate defines the "ports" (`HistoryStore`, `LlmProvider`) that the
//! infrastructure layer implements, plus the prompt templates, the
//! generation client and the chat relay. It depends only on
//! `lifeassist-types` -- never on `lifeassist-infra` or any IO crate.

pub mod chat;
pub mod generation;
pub mod history;
pub mod llm;
pub mod prompt;

#[cfg(test)]
mod testing;
