//! Generation client: provider calls with failures rendered as content.
//!
//! Nothing here returns an error to the HTTP layer. A failed single-shot
//! call yields `Err(ModelFailure)`, which renders as
//! `[Error from model: <details>]`; a failed stream ends with one chunk
//! holding that same marker. The marker is part of the API contract so
//! that a best-effort assistant always answers with a payload.

use std::fmt;
use std::pin::Pin;

use futures_util::{Stream, StreamExt};
use tracing::{Instrument, debug, info_span, warn};

use lifeassist_types::llm::{CompletionRequest, LlmError, StreamEvent};

use super::frame::ChatFrame;
use crate::llm::box_provider::BoxLlmProvider;

/// Finite, non-restartable sequence of reply chunks in provider order.
pub type ReplyStream = Pin<Box<dyn Stream<Item = String> + Send + 'static>>;

/// Result of a single-shot generation. Both arms render to user-visible text.
pub type Reply = Result<String, ModelFailure>;

/// Provider failure carried as reply content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFailure {
    details: String,
}

impl ModelFailure {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            details: details.into(),
        }
    }
}

impl fmt::Display for ModelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Error from model: {}]", self.details)
    }
}

impl From<LlmError> for ModelFailure {
    fn from(e: LlmError) -> Self {
        Self::new(e.to_string())
    }
}

/// Render either arm of a [`Reply`] as the response payload.
pub fn reply_text(reply: Reply) -> String {
    reply.unwrap_or_else(|failure| failure.to_string())
}

/// Wraps the configured provider with the error-as-content policy.
pub struct GenerationClient {
    provider: BoxLlmProvider,
}

impl GenerationClient {
    pub fn new(provider: BoxLlmProvider) -> Self {
        Self { provider }
    }

    /// Provider name, for logs and health output.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Model the provider is configured with.
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Generate a reply to a single prompt.
    pub async fn generate_once(&self, prompt: &str) -> Reply {
        self.complete(CompletionRequest::prompt(prompt)).await
    }

    /// Generate a reply to a framed conversation.
    pub async fn chat_once(&self, frame: ChatFrame) -> Reply {
        self.complete(frame.into_request()).await
    }

    /// Stream a reply to a framed conversation.
    ///
    /// Empty deltas are dropped. If the provider fails, one final
    /// `[Error from model: ...]` chunk is emitted and the stream ends.
    pub fn generate_stream(&self, frame: ChatFrame) -> ReplyStream {
        let request = frame.into_request();
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            turns = request.messages.len(),
            "Starting streamed generation"
        );
        let mut events = self.provider.stream(request);

        Box::pin(async_stream::stream! {
            while let Some(event) = events.next().await {
                match event {
                    Ok(StreamEvent::TextDelta { text }) => {
                        if !text.is_empty() {
                            yield text;
                        }
                    }
                    Ok(StreamEvent::Usage(usage)) => {
                        debug!(
                            input_tokens = usage.input_tokens,
                            output_tokens = usage.output_tokens,
                            "Streamed generation usage"
                        );
                    }
                    Ok(StreamEvent::Done) => break,
                    Err(e) => {
                        warn!(error = %e, "Streamed generation failed");
                        yield ModelFailure::from(e).to_string();
                        break;
                    }
                }
            }
        })
    }

    async fn complete(&self, request: CompletionRequest) -> Reply {
        let span = info_span!(
            "generate",
            provider = self.provider.name(),
            model = self.provider.model(),
            turns = request.messages.len(),
        );

        async {
            match self.provider.complete(&request).await {
                Ok(response) => {
                    debug!(
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
                        "Generation complete"
                    );
                    Ok(response.content)
                }
                Err(e) => {
                    warn!(error = %e, "Generation failed");
                    Err(ModelFailure::from(e))
                }
            }
        }
        .instrument(span)
        .await
    }
}
