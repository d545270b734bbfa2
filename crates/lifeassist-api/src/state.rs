//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by the HTTP API.
//! `ChatService` is generic over its history store, but AppState pins it to
//! the JSON-file implementation from lifeassist-infra.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lifeassist_core::chat::service::ChatService;
use lifeassist_core::generation::client::GenerationClient;
use lifeassist_core::history::service::HistoryService;
use lifeassist_core::llm::box_provider::BoxLlmProvider;
use lifeassist_infra::config::{Credentials, load_config};
use lifeassist_infra::filesystem::{history_dir, resolve_data_dir};
use lifeassist_infra::history::FileHistoryStore;
use lifeassist_infra::llm::create_provider;
use lifeassist_types::config::AppConfig;

/// Concrete chat service pinned to the file history store.
pub type ConcreteChatService = ChatService<FileHistoryStore>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<AppConfig>,
    pub data_dir: PathBuf,
    /// Whether a provider API key was found at startup.
    pub api_key_present: bool,
}

impl AppState {
    /// Initialize the application state: resolve paths, load config and
    /// credentials, wire services.
    pub async fn init(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir, config_path).await;
        let credentials = Credentials::from_env();
        let api_key_present = credentials.is_present();
        let provider = create_provider(&config.llm, credentials)?;

        let state = Self::from_parts(config, provider, data_dir, api_key_present);
        tracing::info!(
            provider = state.chat_service.client().provider_name(),
            model = state.model_name(),
            history_dir = %state.chat_service.history().store().dir().display(),
            api_key_present,
            "Application state initialized"
        );

        Ok(state)
    }

    /// Wire services from already-resolved parts.
    pub fn from_parts(
        config: AppConfig,
        provider: BoxLlmProvider,
        data_dir: PathBuf,
        api_key_present: bool,
    ) -> Self {
        let store = FileHistoryStore::new(history_dir(&data_dir));
        let history = HistoryService::new(store, config.history.max_turns);
        let client = GenerationClient::new(provider);
        let chat_service = ChatService::new(Arc::new(client), Arc::new(history));

        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            api_key_present,
        }
    }

    /// Model name reported by `/health`.
    pub fn model_name(&self) -> &str {
        self.chat_service.client().model()
    }
}
