//! HTTP surface of the task service.
//!
//! Four operations over /todos, each a thin translation between HTTP and
//! the store. Failures map to a fixed taxonomy: 400 for bad input, 404 for
//! unknown ids, 500 (with no internal detail) for everything else.

use crate::store::{StoreError, TodoStore};
use crate::todo::Todo;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub store: TodoStore,
}

pub type SharedState = Arc<AppState>;

// ── Router ─────────────────────────────────────────────────────

/// The four /todos operations plus request tracing and any-origin CORS
/// (the page may be served from anywhere; no auth is required or checked).
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/:id", delete(delete_todo).patch(toggle_todo))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

// ── Handlers ───────────────────────────────────────────────────

// GET /todos
async fn list_todos(State(state): State<SharedState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = state.store.list()?;
    Ok(Json(todos))
}

// POST /todos
//
// Only the `text` field of the body is read. Everything else the client
// sends (completed, id, timestamps) is ignored, so records only ever enter
// the store with server-assigned defaults.
async fn create_todo(
    State(state): State<SharedState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let text = body
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ApiError::Validation("text is required".to_string()))?;

    let todo = state.store.create(text)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

// DELETE /todos/:id
async fn delete_todo(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Confirmation>, ApiError> {
    if state.store.delete(id)? {
        Ok(Json(Confirmation {
            message: "todo deleted".to_string(),
        }))
    } else {
        Err(ApiError::NotFound("no todo with that id".to_string()))
    }
}

// PATCH /todos/:id — flips `completed`; carries no body.
async fn toggle_todo(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state.store.update(id, |t| t.completed = !t.completed)?;
    Ok(Json(todo))
}

// ── Response bodies ────────────────────────────────────────────

/// Confirmation body for successful deletes.
#[derive(Debug, Serialize, Deserialize)]
pub struct Confirmation {
    pub message: String,
}

/// Error body shape shared by every failure response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ── Errors ─────────────────────────────────────────────────────

/// Failure taxonomy of the HTTP surface.
///
/// `Server` carries no detail on purpose: the underlying failure is logged
/// at the conversion boundary and the response body says only "server
/// error".
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Server,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyText => ApiError::Validation("text must not be empty".to_string()),
            StoreError::NotFound => ApiError::NotFound("no todo with that id".to_string()),
            other => {
                tracing::error!("store failure: {other}");
                ApiError::Server
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Server => (StatusCode::INTERNAL_SERVER_ERROR, "server error".to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn temp_state(name: &str) -> (SharedState, String) {
        let path = format!("/tmp/ticklist_api_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path);
        let store = TodoStore::open(&path).unwrap();
        (Arc::new(AppState { store }), path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_uses_only_the_text_field() {
        let (state, path) = temp_state("fields");

        let (status, Json(todo)) = create_todo(
            State(state),
            Json(json!({
                "text": "buy milk",
                "completed": true,
                "id": "11111111-1111-1111-1111-111111111111",
                "createdAt": "2001-01-01T00:00:00Z"
            })),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(todo.text, "buy milk");
        assert!(!todo.completed);
        assert_ne!(todo.id.to_string(), "11111111-1111-1111-1111-111111111111");

        cleanup(&path);
    }

    #[tokio::test]
    async fn create_rejects_missing_blank_and_non_string_text() {
        let (state, path) = temp_state("validate");

        let missing = create_todo(State(state.clone()), Json(json!({}))).await;
        assert!(matches!(missing.unwrap_err(), ApiError::Validation(_)));

        let blank = create_todo(State(state.clone()), Json(json!({ "text": "   " }))).await;
        assert!(matches!(blank.unwrap_err(), ApiError::Validation(_)));

        let numeric = create_todo(State(state.clone()), Json(json!({ "text": 5 }))).await;
        assert!(matches!(numeric.unwrap_err(), ApiError::Validation(_)));

        // Nothing slipped into the store
        let Json(todos) = list_todos(State(state)).await.unwrap();
        assert!(todos.is_empty());

        cleanup(&path);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let (state, path) = temp_state("order");

        for text in ["first", "second", "third"] {
            create_todo(State(state.clone()), Json(json!({ "text": text })))
                .await
                .unwrap();
        }

        let Json(todos) = list_todos(State(state)).await.unwrap();
        let texts: Vec<&str> = todos.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["third", "second", "first"]);

        cleanup(&path);
    }

    #[tokio::test]
    async fn toggle_flips_and_flips_back() {
        let (state, path) = temp_state("toggle");

        let (_, Json(created)) = create_todo(State(state.clone()), Json(json!({ "text": "x" })))
            .await
            .unwrap();

        let Json(on) = toggle_todo(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert!(on.completed);

        let Json(off) = toggle_todo(State(state), Path(created.id)).await.unwrap();
        assert!(!off.completed);

        cleanup(&path);
    }

    #[tokio::test]
    async fn toggle_and_delete_missing_are_not_found() {
        let (state, path) = temp_state("missing");
        let id = Uuid::new_v4();

        let toggled = toggle_todo(State(state.clone()), Path(id)).await;
        assert!(matches!(toggled.unwrap_err(), ApiError::NotFound(_)));

        let deleted = delete_todo(State(state), Path(id)).await;
        assert!(matches!(deleted.unwrap_err(), ApiError::NotFound(_)));

        cleanup(&path);
    }

    #[tokio::test]
    async fn delete_confirms_then_404s() {
        let (state, path) = temp_state("delete");

        let (_, Json(created)) = create_todo(State(state.clone()), Json(json!({ "text": "x" })))
            .await
            .unwrap();

        let Json(confirmation) = delete_todo(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert_eq!(confirmation.message, "todo deleted");

        let again = delete_todo(State(state), Path(created.id)).await;
        assert!(matches!(again.unwrap_err(), ApiError::NotFound(_)));

        cleanup(&path);
    }

    #[tokio::test]
    async fn error_responses_carry_the_error_field() {
        let resp = ApiError::Validation("text is required".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "text is required");

        let resp = ApiError::NotFound("no todo with that id".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "no todo with that id");
    }

    #[tokio::test]
    async fn backend_failures_never_leak_detail() {
        let err: ApiError = StoreError::Redb("corrupt page at offset 42".to_string()).into();
        let resp = err.into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "server error");
    }
}
