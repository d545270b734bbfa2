//! GeminiProvider -- concrete [`LlmProvider`] implementation for the Gemini API.
//!
//! Sends requests to the native `generateContent` endpoints with the key in
//! the `x-goog-api-key` header. Supports both non-streaming
//! (`generateContent`) and streaming (`streamGenerateContent?alt=sse`) modes.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use lifeassist_core::llm::provider::{LlmProvider, ProviderStream};
use lifeassist_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::streaming::create_gemini_stream;
use super::types::{GenerateContentRequest, GenerateContentResponse, error_message};

/// Header carrying the API key.
pub(crate) const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers. A provider without a key is still
/// constructed; every call then fails with
/// [`LlmError::AuthenticationFailed`].
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Public Generative Language API root.
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Create a new Gemini provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Gemini API key, if one was configured.
    /// * `model` - Model identifier (e.g., "gemini-1.5-flash"). A leading
    ///   `models/` is accepted and stripped.
    /// * `timeout` - Overall request timeout. `None` waits indefinitely.
    pub fn new(
        api_key: Option<SecretString>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| LlmError::Provider {
            message: format!("failed to create HTTP client: {e}"),
        })?;

        let model = model.into();
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model,
        })
    }

    /// Point the provider at a different API root (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the full URL for a model action.
    fn url(&self, action: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, action)
    }
}

// GeminiProvider intentionally does NOT derive Debug to prevent
// accidental exposure of the API key.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::AuthenticationFailed)?;
        let body = GenerateContentRequest::from_turns(&request.messages);
        let url = self.url("generateContent");

        tracing::debug!(url = %url, model = %self.model, "Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;
        let response = ensure_success(response).await?;

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        if parsed.candidates.is_empty() {
            let reason = parsed.block_reason().unwrap_or("unspecified");
            return Err(LlmError::Deserialization(format!(
                "response has no candidates (block reason: {reason})"
            )));
        }

        Ok(CompletionResponse {
            content: parsed.text(),
            model: parsed
                .model_version
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            finish_reason: parsed.finish_reason().map(str::to_string),
            usage: parsed
                .usage_metadata
                .as_ref()
                .map(Usage::from)
                .unwrap_or_default(),
        })
    }

    fn stream(&self, request: CompletionRequest) -> ProviderStream {
        let body = GenerateContentRequest::from_turns(&request.messages);
        let url = self.url("streamGenerateContent?alt=sse");

        create_gemini_stream(&self.client, &url, body, self.api_key.as_ref())
    }
}

/// Pass a 2xx response through; map anything else to an [`LlmError`].
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after_ms = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let error_body = response.text().await.unwrap_or_default();
    tracing::warn!(status = %status, body = %error_body, "Gemini API error response");

    Err(status_error(status.as_u16(), &error_body, retry_after_ms))
}

/// HTTP status to [`LlmError`].
fn status_error(status: u16, body: &str, retry_after_ms: Option<u64>) -> LlmError {
    let message = error_message(body);
    match status {
        400 => LlmError::InvalidRequest(message),
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited { retry_after_ms },
        503 => LlmError::Overloaded(message),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {message}"),
        },
    }
}
