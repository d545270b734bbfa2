//! One pretty-printed JSON file per chat session.
//!
//! Files live at `{history_dir}/chat_{session_id}.json`. Session ids are
//! sanitized by [`SessionId`] so they are always safe file name fragments.
//! Writes go to a sibling temp file that is then renamed over the target,
//! so readers see either the old or the new record, never a torn one.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use lifeassist_core::history::store::HistoryStore;
use lifeassist_types::chat::{ChatTurn, SessionId};
use lifeassist_types::error::HistoryError;

/// Distinguishes temp files of concurrent writers within one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Filesystem-backed [`HistoryStore`].
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Compute the record path for a session: `{dir}/chat_{id}.json`.
    pub fn path_for(&self, session: &SessionId) -> PathBuf {
        self.dir.join(format!("chat_{}.json", session.as_str()))
    }

    fn temp_path_for(&self, session: &SessionId) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            ".chat_{}.json.{}.{n}.tmp",
            session.as_str(),
            std::process::id()
        ))
    }
}

impl HistoryStore for FileHistoryStore {
    async fn load(&self, session: &SessionId) -> Result<Option<Vec<ChatTurn>>, HistoryError> {
        let path = self.path_for(session);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let turns: Vec<ChatTurn> = serde_json::from_str(&content)
            .map_err(|e| HistoryError::Corrupt(format!("{}: {e}", path.display())))?;

        tracing::debug!(session = %session, turns = turns.len(), "Loaded chat history");
        Ok(Some(turns))
    }

    async fn save(&self, session: &SessionId, turns: &[ChatTurn]) -> Result<(), HistoryError> {
        let json =
            serde_json::to_string_pretty(turns).map_err(|e| HistoryError::Encode(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir).await?;

        let temp = self.temp_path_for(session);
        if let Err(e) = tokio::fs::write(&temp, json.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp, self.path_for(session)).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(session = %session, turns = turns.len(), "Saved chat history");
        Ok(())
    }
}
