//! Store statistics.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/stats", get(get_stats))
}

/// GET /api/stats — entity counts and observer counters.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let counts = state.store.counts();
    let tracker = state.tracker.stats();

    Json(serde_json::json!({
        "categories": counts.categories,
        "notes": counts.notes,
        "pinnedNotes": counts.pinned_notes,
        "listeners": state.store.bus().len(),
        "tracker": tracker,
        "storePath": state.store.path().display().to_string(),
        "port": state.config.port,
    }))
}
