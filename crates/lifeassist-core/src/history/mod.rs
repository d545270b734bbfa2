//! Session-scoped chat history persistence.
//!
//! `HistoryStore` is the port the infrastructure layer implements (one
//! record per session). `HistoryService` wraps a store with the fail-open
//! policy the rest of the application relies on: reads degrade to an empty
//! history and writes never report failure.

pub mod service;
pub mod store;
