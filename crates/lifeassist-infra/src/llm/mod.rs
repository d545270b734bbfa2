//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `lifeassist-core`, plus a provider factory ([`create_provider`]) that
//! constructs it from the `[llm]` config section and resolved credentials.
//!
//! [`LlmProvider`]: lifeassist_core::llm::provider::LlmProvider

pub mod gemini;

use std::time::Duration;

use lifeassist_core::llm::box_provider::BoxLlmProvider;
use lifeassist_types::config::LlmConfig;
use lifeassist_types::llm::LlmError;

use crate::config::Credentials;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from the `[llm]` config section.
///
/// A missing API key is not an error here: the provider is still built and
/// reports [`LlmError::AuthenticationFailed`] on each call, so the server
/// can start and answer `/health` without credentials.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be constructed.
pub fn create_provider(
    config: &LlmConfig,
    credentials: Credentials,
) -> Result<BoxLlmProvider, LlmError> {
    if !credentials.is_present() {
        tracing::warn!("No Gemini API key configured; generation calls will fail");
    }

    let provider = GeminiProvider::new(
        credentials.into_api_key(),
        config.model.clone(),
        config.timeout_secs.map(Duration::from_secs),
    )?
    .with_base_url(config.base_url.clone());

    tracing::info!(provider = "gemini", model = %config.model, "LLM provider configured");
    Ok(BoxLlmProvider::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_from_default_config() {
        let config = LlmConfig::default();
        let provider =
            create_provider(&config, Credentials::from_lookup(|_| Some("k".to_string()))).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.model(), "gemini-1.5-flash");
    }

    #[test]
    fn test_create_provider_without_key_still_builds() {
        let config = LlmConfig {
            model: "gemini-2.0-flash".to_string(),
            timeout_secs: Some(30),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config, Credentials::default()).unwrap();
        assert_eq!(provider.model(), "gemini-2.0-flash");
    }

    #[tokio::test]
    async fn test_create_provider_without_key_fails_at_call_time() {
        let provider = create_provider(&LlmConfig::default(), Credentials::default()).unwrap();
        let err = provider
            .complete(&lifeassist_types::llm::CompletionRequest::prompt("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }
}
