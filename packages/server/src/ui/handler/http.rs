//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::websocket::{ProblemStatementDto, StateMessage},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current session snapshot, same shape as the pushed `state` message
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateMessage> {
    let snapshot = state.broadcaster.snapshot().await;
    Json(StateMessage::from(&snapshot))
}

/// Problem catalog
pub async fn get_problems(State(state): State<Arc<AppState>>) -> Json<Vec<ProblemStatementDto>> {
    let snapshot = state.broadcaster.snapshot().await;

    // Domain Model から DTO への変換
    let problems = snapshot
        .problem_statements
        .iter()
        .map(ProblemStatementDto::from)
        .collect();

    Json(problems)
}
