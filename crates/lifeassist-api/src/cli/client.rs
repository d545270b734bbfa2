//! HTTP client for a running `lifeassist serve`.

use anyhow::{Context, Result, bail};
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use lifeassist_core::prompt::TaskKind;
use lifeassist_types::chat::ChatTurn;

use crate::http::handlers::tasks;

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub model_name: String,
    pub api_key_present: bool,
}

#[derive(Deserialize)]
struct HistoryBody {
    #[serde(default)]
    messages: Vec<ChatTurn>,
}

#[derive(Deserialize)]
struct ChatBody {
    #[serde(default)]
    reply: String,
}

/// Thin wrapper over `reqwest` for the lifeassist HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await.with_context(|| {
            format!(
                "could not reach {} (is `lifeassist serve` running?)",
                self.base_url
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("server returned HTTP {status}: {body}");
        }
        Ok(response)
    }

    pub async fn health(&self) -> Result<Health> {
        let response = self.send(self.http.get(self.url("/health"))).await?;
        response.json().await.context("invalid /health response")
    }

    /// Run a one-shot task and return the generated text.
    pub async fn task(&self, kind: TaskKind, input: &str) -> Result<String> {
        let mut body = Map::new();
        body.insert(kind.input_field().to_string(), Value::String(input.to_string()));

        let response = self
            .send(self.http.post(self.url(tasks::route(kind))).json(&body))
            .await?;
        let value: Value = response.json().await.context("invalid task response")?;

        value
            .get(kind.output_field())
            .and_then(Value::as_str)
            .map(str::to_string)
            .with_context(|| format!("response is missing `{}`", kind.output_field()))
    }

    pub async fn history(&self, session: &str) -> Result<Vec<ChatTurn>> {
        let request = self
            .http
            .get(self.url("/chat/history"))
            .query(&[("session_id", session)]);
        let body: HistoryBody = self
            .send(request)
            .await?
            .json()
            .await
            .context("invalid history response")?;
        Ok(body.messages)
    }

    pub async fn chat(&self, session: &str, messages: &[ChatTurn]) -> Result<String> {
        let request = self
            .http
            .post(self.url("/chat"))
            .json(&json!({"session_id": session, "messages": messages}));
        let body: ChatBody = self
            .send(request)
            .await?
            .json()
            .await
            .context("invalid chat response")?;
        Ok(body.reply)
    }

    /// Start a streamed chat. Items are raw body chunks as they arrive.
    pub async fn chat_stream(
        &self,
        session: &str,
        messages: &[ChatTurn],
    ) -> Result<impl Stream<Item = Result<Vec<u8>>> + use<>> {
        let request = self
            .http
            .post(self.url("/chat/stream"))
            .json(&json!({"session_id": session, "messages": messages}));
        let response = self.send(request).await?;

        Ok(response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .context("connection lost while streaming")
        }))
    }
}
