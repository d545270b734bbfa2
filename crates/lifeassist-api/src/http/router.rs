//! Axum router configuration with middleware.
//!
//! Routes are mounted at the root. Middleware: CORS (any origin, since the
//! UI runs as a separate process) and request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use lifeassist_core::prompt::TaskKind;

use crate::http::handlers::{chat, health, tasks};
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        // One-shot assistant tasks
        .route(tasks::route(TaskKind::Summarize), post(tasks::summarize))
        .route(tasks::route(TaskKind::Plan), post(tasks::plan))
        .route(tasks::route(TaskKind::Rephrase), post(tasks::rephrase))
        .route(tasks::route(TaskKind::Quote), post(tasks::quote))
        // Chat
        .route("/chat/history", get(chat::get_history))
        .route("/chat", post(chat::chat))
        .route("/chat/stream", post(chat::chat_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
