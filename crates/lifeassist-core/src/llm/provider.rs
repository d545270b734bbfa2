//! LlmProvider trait definition.
//!
//! This is the core abstraction that text-generation backends implement.
//! Uses RPITIT for `complete`, and `Pin<Box<dyn Stream>>` for `stream`
//! (streams need to be object-safe for the BoxLlmProvider wrapper).

use std::pin::Pin;

use futures_util::Stream;

use lifeassist_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Boxed provider event stream.
pub type ProviderStream = Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

/// Trait for text-generation backends (Gemini, test doubles, ...).
///
/// Implementations live in lifeassist-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Model used when a request does not name one.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    ///
    /// The stream ends after `Done` or after the first `Err` item.
    fn stream(&self, request: CompletionRequest) -> ProviderStream;
}
