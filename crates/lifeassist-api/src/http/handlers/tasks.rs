//! One-shot assistant task endpoints.
//!
//! POST /summarize `{text}`  -> `{summary}`
//! POST /planner   `{tasks}` -> `{plan}`
//! POST /rephrase  `{text}`  -> `{rephrased}`
//! POST /quote     `{mood}`  -> `{quote}`
//!
//! Each handler builds one prompt and returns the model's text (or the
//! error marker) under the task's response field. Always 200.

use axum::Json;
use axum::extract::State;
use serde_json::{Map, Value};

use lifeassist_core::generation::client::reply_text;
use lifeassist_core::prompt::TaskKind;

use crate::http::extractors::lenient::LenientJson;
use crate::state::AppState;

/// Task request bodies are free-form JSON objects.
pub type TaskBody = Map<String, Value>;

/// Route path serving a task.
pub fn route(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::Summarize => "/summarize",
        TaskKind::Plan => "/planner",
        TaskKind::Rephrase => "/rephrase",
        TaskKind::Quote => "/quote",
    }
}

pub async fn summarize(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<TaskBody>,
) -> Json<Value> {
    run_task(&state, TaskKind::Summarize, &body).await
}

pub async fn plan(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<TaskBody>,
) -> Json<Value> {
    run_task(&state, TaskKind::Plan, &body).await
}

pub async fn rephrase(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<TaskBody>,
) -> Json<Value> {
    run_task(&state, TaskKind::Rephrase, &body).await
}

pub async fn quote(
    State(state): State<AppState>,
    LenientJson(body): LenientJson<TaskBody>,
) -> Json<Value> {
    run_task(&state, TaskKind::Quote, &body).await
}

async fn run_task(state: &AppState, kind: TaskKind, body: &TaskBody) -> Json<Value> {
    let input = input_text(body, kind.input_field());
    tracing::debug!(task = %kind, input_len = input.len(), "Running assistant task");

    let prompt = kind.build_prompt(&input);
    let text = reply_text(state.chat_service.client().generate_once(&prompt).await);

    let mut response = Map::new();
    response.insert(kind.output_field().to_string(), Value::String(text));
    Json(Value::Object(response))
}

/// The named input as text. Missing or null is empty; non-string values use
/// their JSON rendering.
fn input_text(body: &TaskBody, field: &str) -> String {
    match body.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> TaskBody {
        match value {
            Value::Object(map) => map,
            _ => TaskBody::new(),
        }
    }

    #[test]
    fn test_input_text() {
        let b = body(json!({"text": "hi", "n": 3, "z": null}));
        assert_eq!(input_text(&b, "text"), "hi");
        assert_eq!(input_text(&b, "n"), "3");
        assert_eq!(input_text(&b, "z"), "");
        assert_eq!(input_text(&b, "missing"), "");
    }

    #[test]
    fn test_routes_are_distinct() {
        let routes: Vec<_> = TaskKind::ALL.iter().map(|k| route(*k)).collect();
        assert_eq!(routes, vec!["/summarize", "/planner", "/rephrase", "/quote"]);
    }
}
