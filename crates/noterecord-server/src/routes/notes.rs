//! Note routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use noterecord_command::Command;

use super::{run, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNoteBody {
    pub category_id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Only the fields present in the body are changed.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub pinned: Option<bool>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notes", post(create_note))
        .route("/notes/{id}", patch(update_note).delete(delete_note))
}

async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateNoteBody>,
) -> ApiResult {
    run(
        &state,
        Command::CreateNote {
            category_id: body.category_id,
            title: body.title,
            content: body.content,
            pinned: body.pinned,
        },
    )
}

async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateNoteBody>,
) -> ApiResult {
    run(
        &state,
        Command::UpdateNote {
            note_id: id,
            title: body.title,
            content: body.content,
            pinned: body.pinned,
        },
    )
}

async fn delete_note(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    run(&state, Command::DeleteNote { note_id: id })
}
