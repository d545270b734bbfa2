//! GET /health

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Liveness plus configuration visibility. Never calls the provider.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_name: String,
    pub api_key_present: bool,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_name: state.model_name().to_string(),
        api_key_present: state.api_key_present,
    })
}
