//! Fail-open history access with a per-session retention cap.

use tracing::{debug, warn};

use lifeassist_types::chat::{ChatTurn, SessionId};

use super::store::HistoryStore;

/// Wraps a [`HistoryStore`] so callers never see persistence errors.
///
/// `load` collapses every failure (missing record, unreadable file, corrupt
/// content) into an empty history; `save` logs and drops write failures.
/// A failed save must never block returning a generated reply.
pub struct HistoryService<S: HistoryStore> {
    store: S,
    max_turns: usize,
}

impl<S: HistoryStore> HistoryService<S> {
    /// Create a service keeping at most `max_turns` turns per session (`0` = no cap).
    pub fn new(store: S, max_turns: usize) -> Self {
        Self { store, max_turns }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the turns for a session, or an empty list.
    pub async fn load(&self, session: &SessionId) -> Vec<ChatTurn> {
        match self.store.load(session).await {
            Ok(Some(turns)) => turns,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(session = %session, error = %e, "Discarding unreadable chat history");
                Vec::new()
            }
        }
    }

    /// Overwrite the turns for a session. Failures are logged and swallowed.
    pub async fn save(&self, session: &SessionId, turns: &[ChatTurn]) {
        let kept = self.retained(turns);
        if kept.len() < turns.len() {
            debug!(
                session = %session,
                dropped = turns.len() - kept.len(),
                "Trimming chat history to retention cap"
            );
        }

        if let Err(e) = self.store.save(session, kept).await {
            warn!(session = %session, error = %e, "Failed to persist chat history");
        }
    }

    /// The newest `max_turns` turns.
    fn retained<'a>(&self, turns: &'a [ChatTurn]) -> &'a [ChatTurn] {
        if self.max_turns == 0 || turns.len() <= self.max_turns {
            turns
        } else {
            &turns[turns.len() - self.max_turns..]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryHistoryStore;

    fn turns() -> Vec<ChatTurn> {
        vec![
            ChatTurn::user("Bonjour, ça va ?"),
            ChatTurn::model("Très bien 😊"),
            ChatTurn::user("今日の予定は？"),
        ]
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let service = HistoryService::new(MemoryHistoryStore::new(), 0);
        let session = SessionId::from("trip");

        service.save(&session, &turns()).await;
        assert_eq!(service.load(&session).await, turns());
    }

    #[tokio::test]
    async fn test_unknown_session_loads_empty() {
        let service = HistoryService::new(MemoryHistoryStore::new(), 0);
        assert!(service.load(&SessionId::from("never-used")).await.is_empty());
    }

    #[tokio::test]
    async fn test_load_failure_is_empty() {
        let service = HistoryService::new(MemoryHistoryStore::failing(), 0);
        assert!(service.load(&SessionId::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let service = HistoryService::new(MemoryHistoryStore::failing(), 0);
        service.save(&SessionId::default(), &turns()).await;
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn test_cap_keeps_newest_turns() {
        let service = HistoryService::new(MemoryHistoryStore::new(), 2);
        let session = SessionId::default();

        service.save(&session, &turns()).await;
        assert_eq!(service.load(&session).await, turns()[1..].to_vec());
    }

    #[tokio::test]
    async fn test_default_cap_truncates_long_roundtrip() {
        let cap = lifeassist_types::config::HistoryConfig::default().max_turns;
        let long: Vec<ChatTurn> = (0..cap + 3).map(|i| ChatTurn::user(format!("turn {i}"))).collect();
        let session = SessionId::default();

        let capped = HistoryService::new(MemoryHistoryStore::new(), cap);
        capped.save(&session, &long[..cap]).await;
        assert_eq!(capped.load(&session).await, long[..cap].to_vec());

        capped.save(&session, &long).await;
        let loaded = capped.load(&session).await;
        assert_eq!(loaded.len(), cap);
        assert_eq!(loaded, long[3..].to_vec());

        let uncapped = HistoryService::new(MemoryHistoryStore::new(), 0);
        uncapped.save(&session, &long).await;
        assert_eq!(uncapped.load(&session).await, long);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let service = HistoryService::new(MemoryHistoryStore::new(), 0);
        let session = SessionId::default();

        service.save(&session, &turns()).await;
        service.save(&session, &[ChatTurn::user("only")]).await;
        assert_eq!(service.load(&session).await, vec![ChatTurn::user("only")]);
    }
}
