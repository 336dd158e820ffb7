//! Category routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde::Deserialize;

use noterecord_command::Command;

use super::{run, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", post(create_category))
        .route("/categories/{id}", delete(delete_category))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateCategoryBody>,
) -> ApiResult {
    run(&state, Command::CreateCategory { name: body.name })
}

async fn delete_category(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> ApiResult {
    run(&state, Command::DeleteCategory { category_id: id })
}
