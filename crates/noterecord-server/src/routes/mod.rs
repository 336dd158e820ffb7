//! HTTP route handlers — a thin caller of the command layer.

pub mod categories;
pub mod commands;
pub mod notes;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use noterecord_command::{Command, CommandError, ErrorKind};

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(commands::routes())
        .merge(categories::routes())
        .merge(notes::routes())
        .merge(stats::routes())
}

/// A rejected command rendered as `{code, message}` with a matching status.
pub struct ApiError(pub CommandError);

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Duplicate | ErrorKind::NotEmpty => StatusCode::CONFLICT,
            ErrorKind::Error => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

pub type ApiResult = Result<Json<noterecord_command::Response>, ApiError>;

/// Execute a command and wrap the outcome for axum.
pub(crate) fn run(state: &AppState, command: Command) -> ApiResult {
    state.commands.execute(command).map(Json).map_err(ApiError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use noterecord_core::config::DEFAULT_PORT;
    use noterecord_core::{DataPaths, NoteRecordConfig};
    use noterecord_store::NoteStore;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<AppState>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = NoteRecordConfig {
            port: DEFAULT_PORT,
            data_paths: DataPaths::new(dir.path().join("data")).unwrap(),
        };
        let store = NoteStore::open(&config.data_paths.notes_file).unwrap();
        let state = Arc::new(AppState::new(config, Arc::new(store)));
        (build_router(state.clone()), state, dir)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_kinds_map_to_status() {
        let cases = [
            (ErrorKind::InvalidInput, StatusCode::BAD_REQUEST),
            (ErrorKind::NotFound, StatusCode::NOT_FOUND),
            (ErrorKind::Duplicate, StatusCode::CONFLICT),
            (ErrorKind::NotEmpty, StatusCode::CONFLICT),
            (ErrorKind::Error, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (kind, status) in cases {
            let response = ApiError(CommandError::new(kind, "nope")).into_response();
            assert_eq!(response.status(), status, "{kind}");
            assert_eq!(
                body_of(response).await,
                json!({"code": kind.code(), "message": "nope"})
            );
        }
    }

    #[tokio::test]
    async fn test_category_routes() {
        let (app, _state, _dir) = test_app();

        let (status, work) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "Work"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(work["name"], "Work");

        let (status, err) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "work"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["code"], "duplicate");

        let (status, err) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err, json!({"code": "invalid_input", "message": "Category name is required"}));

        let (status, err) = send(&app, Method::DELETE, "/api/categories/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err, json!({"code": "not_found", "message": "Category not found"}));
    }

    #[tokio::test]
    async fn test_delete_non_empty_category_conflicts() {
        let (app, _state, _dir) = test_app();
        let (_, work) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "Work"}))).await;
        let (_, note) = send(
            &app,
            Method::POST,
            "/api/notes",
            Some(json!({"category_id": work["id"], "title": "Plan"})),
        )
        .await;

        let uri = format!("/api/categories/{}", work["id"].as_str().unwrap());
        let (status, err) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["code"], "not_empty");

        let note_uri = format!("/api/notes/{}", note["id"].as_str().unwrap());
        let (status, body) = send(&app, Method::DELETE, &note_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deleted": true}));

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deleted": true}));
    }

    #[tokio::test]
    async fn test_patch_note_changes_only_supplied_fields() {
        let (app, state, _dir) = test_app();
        let (_, work) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "Work"}))).await;
        let (_, note) = send(
            &app,
            Method::POST,
            "/api/notes",
            Some(json!({"category_id": work["id"], "title": "Plan", "content": "draft"})),
        )
        .await;
        assert_eq!(note["pinned"], false);

        let uri = format!("/api/notes/{}", note["id"].as_str().unwrap());
        let (status, updated) =
            send(&app, Method::PATCH, &uri, Some(json!({"pinned": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["pinned"], true);
        assert_eq!(updated["title"], "Plan");
        assert_eq!(updated["content"], "draft");

        let stored = state.store.get_note(note["id"].as_str().unwrap()).unwrap();
        assert_eq!(stored.content, "draft");

        let (status, err) = send(
            &app,
            Method::PATCH,
            "/api/notes/missing",
            Some(json!({"title": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err, json!({"code": "not_found", "message": "Note not found"}));
    }

    #[test]
    fn test_patch_body_absent_fields_stay_unset() {
        let body: notes::UpdateNoteBody = serde_json::from_value(json!({"pinned": false})).unwrap();
        assert_eq!(body.pinned, Some(false));
        assert!(body.title.is_none());
        assert!(body.content.is_none());

        let empty: notes::UpdateNoteBody = serde_json::from_value(json!({})).unwrap();
        assert!(empty.title.is_none() && empty.content.is_none() && empty.pinned.is_none());
    }

    #[tokio::test]
    async fn test_storage_failure_is_server_error() {
        let (app, state, dir) = test_app();
        std::fs::remove_dir_all(dir.path().join("data")).unwrap();

        let (status, err) =
            send(&app, Method::POST, "/api/categories", Some(json!({"name": "Work"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err["code"], "error");
        assert!(state.store.categories().is_empty());
    }

    #[tokio::test]
    async fn test_command_endpoint_and_data() {
        let (app, _state, _dir) = test_app();

        let (status, work) = send(
            &app,
            Method::POST,
            "/api/command",
            Some(json!({"type": "create_category", "name": "Work"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, data) = send(&app, Method::GET, "/api/data", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(data, json!({"categories": [work], "notes": []}));

        let (status, stats) = send(&app, Method::GET, "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["categories"], 1);
        assert_eq!(stats["notes"], 0);
        assert_eq!(stats["port"], DEFAULT_PORT);
    }
}
