use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/healthz", get(healthz))
}

/// Health check endpoint — no auth required.
/// Used by deploy checks and ops scripts.
async fn healthz(State(state): State<AppState>) -> Json<Value> {
    let engine_state = state.engine.state().await;
    let snapshot_age_secs = state
        .cache
        .latest()
        .await
        .map(|s| (chrono::Utc::now() - s.taken_at).num_seconds());
    Json(json!({
        "status": "ok",
        "engine": engine_state.to_string(),
        "snapshot_age_secs": snapshot_age_secs,
    }))
}
