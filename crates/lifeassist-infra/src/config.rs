//! Configuration and credential loading for lifeassist.
//!
//! Reads `config.toml` from the data directory (`~/.lifeassist/` in
//! production) or an explicit path and deserializes it into [`AppConfig`].
//! Falls back to sensible defaults when the file is missing or malformed.
//!
//! The provider API key is read once from the process environment into a
//! [`Credentials`] value that is passed explicitly to the provider factory.

use std::path::Path;

use secrecy::SecretString;

use lifeassist_types::config::AppConfig;

/// File name of the configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `llm.model`.
pub const MODEL_ENV: &str = "LIFEASSIST_MODEL";

/// Environment variables holding the API key, in priority order.
pub const API_KEY_ENVS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Load configuration from `path`, or `{data_dir}/config.toml` when `path` is `None`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - Environment overrides are applied last.
pub async fn load_config(data_dir: &Path, path: Option<&Path>) -> AppConfig {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| data_dir.join(CONFIG_FILE));

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => match toml::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Failed to parse {}: {err}, using defaults",
                    config_path.display()
                );
                AppConfig::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", config_path.display());
            AppConfig::default()
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            AppConfig::default()
        }
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
        config.llm.model = model.trim().to_string();
    }
}

/// Provider credentials resolved at startup.
///
/// Does NOT derive Debug so the key never reaches logs.
#[derive(Default)]
pub struct Credentials {
    api_key: Option<SecretString>,
}

impl Credentials {
    /// Read `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve credentials with a custom variable lookup. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = API_KEY_ENVS
            .iter()
            .filter_map(|key| lookup(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(SecretString::from);

        Self { api_key }
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }

    pub fn is_present(&self) -> bool {
        self.api_key.is_some()
    }

    /// Hand the key to a provider.
    pub fn into_api_key(self) -> Option<SecretString> {
        self.api_key
    }
}
