use thiserror::Error;

/// Errors from chat history persistence (used by `HistoryStore` in lifeassist-core).
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt history record: {0}")]
    Corrupt(String),

    #[error("history encode error: {0}")]
    Encode(String),
}
