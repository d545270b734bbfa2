//! Chat endpoints.
//!
//! - `GET /chat/history?session_id=` -- persisted turns of a session
//! - `POST /chat` -- single-shot reply, `{reply}`, always 200
//! - `POST /chat/stream` -- reply streamed as a chunked `text/plain` body
//!
//! Both chat routes take `{messages: [{role, content}], session_id}`.
//! The client owns the conversation: the request's `messages` are the full
//! history, and they replace whatever was stored for the session. Messages
//! are parsed one at a time, so a malformed element never discards the rest.

use std::convert::Infallible;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use lifeassist_types::chat::{ChatTurn, SessionId, deserialize_turns};

use crate::http::extractors::lenient::{LenientJson, LenientQuery};
use crate::state::AppState;

/// Request body for both chat routes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    #[serde(deserialize_with = "deserialize_turns")]
    pub messages: Vec<ChatTurn>,
    pub session_id: SessionId,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HistoryQuery {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// GET /chat/history -- empty list for unknown or unreadable sessions.
pub async fn get_history(
    State(state): State<AppState>,
    LenientQuery(query): LenientQuery<HistoryQuery>,
) -> Json<HistoryResponse> {
    let messages = state.chat_service.load_history(&query.session_id).await;
    Json(HistoryResponse { messages })
}

/// POST /chat -- single-shot reply.
pub async fn chat(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(session = %body.session_id, turns = body.messages.len(), "Chat request");

    let reply = state.chat_service.reply(&body.session_id, body.messages).await;
    Json(ChatResponse { reply })
}

/// POST /chat/stream -- streamed reply.
///
/// Chunks are written as they arrive from the model. A failure mid-stream
/// ends the body with an `[Error from model: ...]` chunk; the status is
/// always 200.
pub async fn chat_stream(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<ChatRequest>,
) -> Response {
    tracing::debug!(session = %body.session_id, turns = body.messages.len(), "Chat stream request");

    let chunks = state
        .chat_service
        .reply_stream(body.session_id, body.messages)
        .map(Ok::<_, Infallible>);

    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(chunks),
    )
        .into_response()
}
