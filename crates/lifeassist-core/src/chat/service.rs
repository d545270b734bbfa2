//! Chat service: generation plus history persistence for one request.
//!
//! Per-request state machine for the streaming relay:
//!
//! ```text
//! START -> (no messages)  -> EMIT_GREETING -> END
//! START -> (has messages) -> STREAMING -> {EMIT_CHUNK}* -> END
//! STREAMING -> ERROR -> EMIT_ERROR_CHUNK -> END
//! ```
//!
//! After `END` following `STREAMING`/`ERROR`, the request's turns plus one
//! model turn holding the concatenated output are persisted.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info};

use lifeassist_types::chat::{ChatTurn, SessionId};

use crate::generation::client::{GenerationClient, ReplyStream};
use crate::generation::frame::ChatFrame;
use crate::history::service::HistoryService;
use crate::history::store::HistoryStore;

/// Reply to an empty conversation. Never involves the provider or history.
pub const GREETING: &str = "Hi! I’m your AI assistant. How can I help today?";

/// Chunks buffered between the relay task and a slow consumer.
const RELAY_BUFFER: usize = 32;

/// Orchestrates a chat request: framing, generation, and persistence.
///
/// Generic over `HistoryStore` so lifeassist-core never depends on
/// lifeassist-infra.
pub struct ChatService<S: HistoryStore> {
    client: Arc<GenerationClient>,
    history: Arc<HistoryService<S>>,
}

impl<S: HistoryStore + 'static> ChatService<S> {
    pub fn new(client: Arc<GenerationClient>, history: Arc<HistoryService<S>>) -> Self {
        Self { client, history }
    }

    /// Access the generation client.
    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Access the history service.
    pub fn history(&self) -> &HistoryService<S> {
        &self.history
    }

    /// Load the persisted turns for a session (empty on any failure).
    pub async fn load_history(&self, session: &SessionId) -> Vec<ChatTurn> {
        self.history.load(session).await
    }

    /// Single-shot chat reply.
    ///
    /// On success persists `turns` plus the model reply. On provider failure
    /// returns the error marker and persists `turns` alone.
    pub async fn reply(&self, session: &SessionId, mut turns: Vec<ChatTurn>) -> String {
        let Some(frame) = ChatFrame::from_turns(&turns) else {
            return GREETING.to_string();
        };

        match self.client.chat_once(frame).await {
            Ok(text) => {
                turns.push(ChatTurn::model(text.clone()));
                self.history.save(session, &turns).await;
                info!(session = %session, turns = turns.len(), "Chat reply persisted");
                text
            }
            Err(failure) => {
                self.history.save(session, &turns).await;
                failure.to_string()
            }
        }
    }

    /// Streamed chat reply.
    ///
    /// The relay runs in its own task: it drains the provider stream,
    /// forwards each chunk to the returned stream, and persists the combined
    /// history once the provider is done. A consumer that goes away stops
    /// delivery only; the relay still finishes and writes history. The
    /// write completes before the returned stream ends.
    pub fn reply_stream(&self, session: SessionId, mut turns: Vec<ChatTurn>) -> ReplyStream {
        let Some(frame) = ChatFrame::from_turns(&turns) else {
            return Box::pin(futures_util::stream::once(async { GREETING.to_string() }));
        };

        let mut chunks = self.client.generate_stream(frame);
        let history = Arc::clone(&self.history);
        let (tx, rx) = mpsc::channel::<String>(RELAY_BUFFER);

        tokio::spawn(async move {
            let mut full = String::new();
            let mut consumer_alive = true;

            while let Some(chunk) = chunks.next().await {
                full.push_str(&chunk);
                if consumer_alive && tx.send(chunk).await.is_err() {
                    debug!(session = %session, "Stream consumer disconnected, draining provider");
                    consumer_alive = false;
                }
            }

            turns.push(ChatTurn::model(full));
            history.save(&session, &turns).await;
            info!(session = %session, turns = turns.len(), "Streamed chat persisted");
        });

        Box::pin(ReceiverStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::testing::{MemoryHistoryStore, ScriptedProvider};

    fn service(provider: ScriptedProvider) -> ChatService<MemoryHistoryStore> {
        ChatService::new(
            Arc::new(GenerationClient::new(BoxLlmProvider::new(provider))),
            Arc::new(HistoryService::new(MemoryHistoryStore::new(), 0)),
        )
    }

    #[tokio::test]
    async fn test_empty_conversation_greets_without_provider() {
        let provider = ScriptedProvider::replying(&["unused"]);
        let requests = provider.requests();
        let service = service(provider);

        assert_eq!(service.reply(&SessionId::default(), Vec::new()).await, GREETING);
        let streamed: Vec<String> = service
            .reply_stream(SessionId::default(), Vec::new())
            .collect()
            .await;

        assert_eq!(streamed, vec![GREETING.to_string()]);
        assert!(requests.lock().unwrap().is_empty());
        assert!(service.history().store().is_empty());
    }

    #[tokio::test]
    async fn test_reply_persists_user_and_model_turns() {
        let service = service(ScriptedProvider::replying(&["Hello", " there"]));
        let session = SessionId::new(None);

        let reply = service.reply(&session, vec![ChatTurn::user("hi")]).await;

        assert_eq!(reply, "Hello there");
        assert_eq!(
            service.load_history(&SessionId::new(None)).await,
            vec![ChatTurn::user("hi"), ChatTurn::model("Hello there")]
        );
    }

    #[tokio::test]
    async fn test_reply_failure_keeps_turns_without_model_reply() {
        let service = service(ScriptedProvider::failing_after(&[], "quota exceeded"));
        let session = SessionId::from("s1");

        let reply = service.reply(&session, vec![ChatTurn::user("hi")]).await;

        assert!(reply.starts_with("[Error from model:"));
        assert_eq!(service.load_history(&session).await, vec![ChatTurn::user("hi")]);
    }

    #[tokio::test]
    async fn test_reply_stream_relays_in_order_and_persists() {
        let service = service(ScriptedProvider::replying(&["one ", "two ", "three"]));
        let session = SessionId::from("stream");
        let turns = vec![ChatTurn::user("count"), ChatTurn::model("ok"), ChatTurn::user("again")];

        let chunks: Vec<String> = service.reply_stream(session.clone(), turns.clone()).collect().await;

        assert_eq!(chunks, vec!["one ", "two ", "three"]);
        let mut expected = turns;
        expected.push(ChatTurn::model("one two three"));
        assert_eq!(service.load_history(&session).await, expected);
    }

    #[tokio::test]
    async fn test_reply_stream_error_chunk_is_persisted() {
        let service = service(ScriptedProvider::failing_after(&["half"], "reset"));
        let session = SessionId::from("broken");

        let chunks: Vec<String> = service
            .reply_stream(session.clone(), vec![ChatTurn::user("go")])
            .collect()
            .await;

        let last = chunks.last().unwrap();
        assert!(last.contains("Error from model"));
        let history = service.load_history(&session).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].content, chunks.concat());
    }

    #[tokio::test]
    async fn test_reply_stream_persists_after_consumer_drops() {
        let service = service(ScriptedProvider::replying(&["a", "b", "c"]));
        let session = SessionId::from("gone");

        let mut stream = service.reply_stream(session.clone(), vec![ChatTurn::user("x")]);
        assert_eq!(stream.next().await.as_deref(), Some("a"));
        drop(stream);

        let mut history = Vec::new();
        for _ in 0..50 {
            history = service.load_history(&session).await;
            if !history.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(history, vec![ChatTurn::user("x"), ChatTurn::model("abc")]);
    }
}
