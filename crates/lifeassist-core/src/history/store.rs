//! HistoryStore trait definition.
//!
//! Follows the same RPITIT pattern as `LlmProvider`: native async fn in
//! traits with explicit `Send` futures.

use lifeassist_types::chat::{ChatTurn, SessionId};
use lifeassist_types::error::HistoryError;

/// Persistence port for per-session turn sequences.
///
/// Implementations live in lifeassist-infra (e.g., `FileHistoryStore`).
pub trait HistoryStore: Send + Sync {
    /// Load the stored turns for a session.
    ///
    /// Returns `Ok(None)` when the session has never been written.
    fn load(
        &self,
        session: &SessionId,
    ) -> impl std::future::Future<Output = Result<Option<Vec<ChatTurn>>, HistoryError>> + Send;

    /// Replace the stored turns for a session.
    fn save(
        &self,
        session: &SessionId,
        turns: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}
