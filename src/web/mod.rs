//! Web Interface
//!
//! TigerStyle: Two pages and a health check over whichever store was selected.
//!
//! Routes:
//! - `GET /` renders the list and the active backend
//! - `POST /submittodoitem` stores a form submission and redirects home
//! - `GET /health` reports liveness and the active backend as JSON

pub mod render;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::item::{Item, ItemError};
use crate::store::{Backend, SelectedStore};

// =============================================================================
// State
// =============================================================================

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    selected: SelectedStore,
}

impl AppState {
    /// Create handler state over the selected store
    pub fn new(selected: SelectedStore) -> Self {
        Self { selected }
    }
}

/// Create the router with all routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/submittodoitem", post(submit_todo_item))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the todo list
///
/// GET /
#[instrument(skip(state), fields(backend = %state.selected.backend()), level = "info")]
async fn index(State(state): State<AppState>) -> Html<String> {
    let store = state.selected.store();
    let items = store.read_items().await;
    Html(render::todo_page(
        &items,
        state.selected.backend(),
        &store.describe(),
    ))
}

/// Form fields for a new item, as raw pairs so repeated keys are allowed
type SubmitTodoItemForm = Vec<(String, String)>;

/// First value submitted under `key`
fn first_field(form: &[(String, String)], key: &str) -> Option<String> {
    form.iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Store a submitted item
///
/// POST /submittodoitem
#[instrument(skip(state, form), fields(backend = %state.selected.backend()), level = "info")]
async fn submit_todo_item(
    State(state): State<AppState>,
    form: Result<Form<SubmitTodoItemForm>, FormRejection>,
) -> Result<Redirect, ApiError> {
    let Form(form) = form.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable form body");
        ApiError::from(ItemError::NameRequired)
    })?;

    let item = Item::new(
        first_field(&form, "itemName"),
        first_field(&form, "itemDescription"),
    )?;
    let name = item.item_name.clone();

    let id = state.selected.store().add_item(item).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to store item");
        ApiError::internal("failed to store item")
    })?;

    tracing::info!(name = %name, id = ?id, "Stored item");

    Ok(Redirect::to("/"))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub backend: String,
    pub version: String,
}

impl From<Backend> for HealthResponse {
    fn from(backend: Backend) -> Self {
        Self {
            status: "ok".to_string(),
            backend: backend.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(state.selected.backend().into())
}

// =============================================================================
// Errors
// =============================================================================

/// API error type that converts to plain-text HTTP responses
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<ItemError> for ApiError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NameRequired => ApiError::bad_request(err.to_string()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileStore, ItemStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn file_app() -> (Router, Arc<FileStore>, TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(FileStore::new(dir.path().join("items.json")));
        let state = AppState::new(SelectedStore::new(store.clone()));
        (router(state), store, dir)
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/submittodoitem")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_index_renders_empty_list() {
        let (app, _store, _dir) = file_app();

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));

        let page = body_text(response).await;
        assert!(page.contains("No items yet."));
        assert!(page.contains(r#"data-backend="local_file""#));
    }

    #[tokio::test]
    async fn test_submit_redirects_and_item_is_listed() {
        let (app, store, _dir) = file_app();

        let response = app
            .clone()
            .oneshot(form_request("itemName=Buy+milk&itemDescription=2%25"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");

        let items = store.read_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "Buy milk");
        assert_eq!(items[0].item_description.as_deref(), Some("2%"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("<strong>Buy milk</strong>"));
        assert!(page.contains("<span>2%</span>"));
    }

    #[tokio::test]
    async fn test_submit_without_description_stores_null() {
        let (app, store, _dir) = file_app();

        let response = app.oneshot(form_request("itemName=Solo")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let items = store.read_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_description, None);
    }

    #[tokio::test]
    async fn test_submit_missing_or_empty_name_is_rejected() {
        let (app, store, _dir) = file_app();
        store
            .add_item(Item::new(Some("existing".to_string()), None).unwrap())
            .await
            .unwrap();

        for body in ["itemDescription=orphan", "itemName=&itemDescription=x", ""] {
            let response = app.clone().oneshot(form_request(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body:?}");
            assert_eq!(body_text(response).await, "itemName required");
        }

        let items = store.read_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "existing");
    }

    #[tokio::test]
    async fn test_repeated_fields_take_first_value() {
        let (app, store, _dir) = file_app();

        let body = "itemName=first&itemName=second&itemDescription=a&itemDescription=b";
        let response = app.oneshot(form_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let items = store.read_items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].item_name, "first");
        assert_eq!(items[0].item_description.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn test_page_names_configured_items_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom-list.json");
        let store = Arc::new(FileStore::new(&path));
        let app = router(AppState::new(SelectedStore::new(store)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let page = body_text(response).await;
        assert!(page.contains("custom-list.json"));
        assert!(!page.contains("items.json"));
    }

    #[tokio::test]
    async fn test_submit_without_form_content_type_is_rejected() {
        let (app, store, _dir) = file_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/submittodoitem")
                    .body(Body::from("itemName=ignored"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "itemName required");
        assert!(store.read_items().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_ascii_submission_round_trips() {
        let (app, store, _dir) = file_app();

        // "Café ☕" / "naïve – ok", percent-encoded as UTF-8
        let body = "itemName=Caf%C3%A9+%E2%98%95&itemDescription=na%C3%AFve+%E2%80%93+ok";
        let response = app.clone().oneshot(form_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let items = store.read_items().await;
        assert_eq!(items[0].item_name, "Café ☕");
        assert_eq!(items[0].item_description.as_deref(), Some("naïve – ok"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(body_text(response).await.contains("Café ☕"));
    }

    /// Store that fails every call, to exercise the error boundary
    struct UnreachableStore;

    #[async_trait]
    impl ItemStore for UnreachableStore {
        fn backend(&self) -> Backend {
            Backend::Remote
        }

        fn describe(&self) -> String {
            "todo_db.items".to_string()
        }

        async fn try_read_items(&self) -> StoreResult<Vec<Item>> {
            Err(StoreError::Connection("server went away".to_string()))
        }

        async fn add_item(&self, _item: Item) -> StoreResult<Option<String>> {
            Err(StoreError::Backend("insert failed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_backend_failures_at_the_boundary() {
        let app = router(AppState::new(SelectedStore::new(Arc::new(UnreachableStore))));

        // Reads degrade to an empty list
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_text(response).await;
        assert!(page.contains("No items yet."));
        assert!(page.contains("Storage: MongoDB"));

        // Writes surface as a server error
        let response = app.oneshot(form_request("itemName=lost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "failed to store item");
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let (app, _store, _dir) = file_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health: HealthResponse = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.backend, "local_file");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }
}
