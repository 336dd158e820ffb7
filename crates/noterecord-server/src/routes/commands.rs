//! Generic command endpoint and the full data snapshot.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};

use noterecord_command::Command;

use super::{run, ApiResult};
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/data", get(get_data))
        .route("/command", post(execute_command))
}

/// GET /api/data — all categories and notes.
async fn get_data(State(state): State<Arc<AppState>>) -> ApiResult {
    run(&state, Command::GetData)
}

/// POST /api/command — any command, tagged by `type`.
async fn execute_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<Command>,
) -> ApiResult {
    run(&state, command)
}
