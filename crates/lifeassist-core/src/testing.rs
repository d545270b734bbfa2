//! Test doubles shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lifeassist_types::chat::{ChatTurn, SessionId};
use lifeassist_types::error::HistoryError;
use lifeassist_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent, Usage};

use crate::history::store::HistoryStore;
use crate::llm::provider::{LlmProvider, ProviderStream};

/// Deterministic provider that replies with a fixed list of chunks.
///
/// `complete` returns the chunks concatenated; `stream` yields them one by
/// one. When built with [`ScriptedProvider::failing_after`], `complete`
/// fails outright and `stream` fails after emitting the chunks.
pub struct ScriptedProvider {
    chunks: Vec<String>,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_string()).collect(),
            failure: None,
            requests: Arc::default(),
        }
    }

    pub fn failing_after(chunks: &[&str], message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::replying(chunks)
        }
    }

    /// Handle to the requests this provider has received.
    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.requests)
    }

    fn record(&self, request: &CompletionRequest) {
        self.requests.lock().unwrap().push(request.clone());
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.record(request);
        if let Some(message) = &self.failure {
            return Err(LlmError::Provider {
                message: message.clone(),
            });
        }
        Ok(CompletionResponse {
            content: self.chunks.concat(),
            model: "scripted-model".to_string(),
            finish_reason: Some("STOP".to_string()),
            usage: Usage::default(),
        })
    }

    fn stream(&self, request: CompletionRequest) -> ProviderStream {
        self.record(&request);
        let chunks = self.chunks.clone();
        let failure = self.failure.clone();
        Box::pin(async_stream::stream! {
            for text in chunks {
                yield Ok(StreamEvent::TextDelta { text });
            }
            match failure {
                Some(message) => {
                    yield Err(LlmError::Stream(message));
                }
                None => {
                    yield Ok(StreamEvent::Usage(Usage { input_tokens: 3, output_tokens: 5 }));
                    yield Ok(StreamEvent::Done);
                }
            }
        })
    }
}

/// In-memory [`HistoryStore`], optionally failing every call.
#[derive(Default)]
pub struct MemoryHistoryStore {
    records: Mutex<HashMap<String, Vec<ChatTurn>>>,
    fail: bool,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn load(&self, session: &SessionId) -> Result<Option<Vec<ChatTurn>>, HistoryError> {
        if self.fail {
            return Err(HistoryError::Corrupt("scripted failure".to_string()));
        }
        Ok(self.records.lock().unwrap().get(session.as_str()).cloned())
    }

    async fn save(&self, session: &SessionId, turns: &[ChatTurn]) -> Result<(), HistoryError> {
        if self.fail {
            return Err(HistoryError::Io(std::io::Error::other("scripted failure")));
        }
        self.records
            .lock()
            .unwrap()
            .insert(session.as_str().to_string(), turns.to_vec());
        Ok(())
    }
}
