//! User HTTP Routes
//!
//! JSON endpoints over [`UserStore`]. Each handler runs exactly one storage
//! operation (plus a read-back for writes) on the blocking pool and maps
//! error kinds to status codes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::{ErrorCode, StructuredError, UserDbError};
use crate::model::{User, UserPatch};
use crate::storage::UserStore;
use crate::storage::users::require_affected;

// ==================
// Shared State
// ==================

/// State shared across user handlers
#[derive(Debug, Clone)]
pub struct UserState {
    pub store: UserStore,
}

impl UserState {
    pub const fn new(store: UserStore) -> Self {
        Self { store }
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error wrapper that renders as a [`StructuredError`] body.
#[derive(Debug)]
pub struct ApiError(pub UserDbError);

impl From<UserDbError> for ApiError {
    fn from(err: UserDbError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(UserDbError::InvalidArgument(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.code());
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        } else {
            warn!(error = %self.0, "request rejected");
        }
        (status, Json(StructuredError::from_error(&self.0))).into_response()
    }
}

/// HTTP status for an error kind.
pub const fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InvalidArgument | ErrorCode::SerializationError => StatusCode::BAD_REQUEST,
        ErrorCode::IntegrityViolation => StatusCode::CONFLICT,
        ErrorCode::StoreUnavailable
        | ErrorCode::ConfigInvalid
        | ErrorCode::ConfigMissingRequired
        | ErrorCode::IoError
        | ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ==================
// User Routes
// ==================

/// Create user routes
pub fn user_routes(state: Arc<UserState>) -> Router {
    Router::new()
        .route(
            "/user",
            post(create_user_handler)
                .get(list_users_handler)
                .put(update_user_handler)
                .patch(patch_user_handler),
        )
        .route(
            "/user/:id",
            get(get_user_handler).delete(delete_user_handler),
        )
        .with_state(state)
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

// ==================
// Helper Functions
// ==================

/// Run a storage call off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| UserDbError::Internal(format!("storage task failed: {err}")))?
        .map_err(ApiError::from)
}

// ==================
// Handlers
// ==================

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn create_user_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(user) = payload?;
    let store = state.store.clone();

    let created = run_blocking(move || {
        let id = store.create(&user)?;
        store.get_by_id(&id)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let store = state.store.clone();
    let user = run_blocking(move || store.get_by_id(&id)).await?;
    Ok(Json(user))
}

async fn list_users_handler(
    State(state): State<Arc<UserState>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let store = state.store.clone();
    let users = run_blocking(move || store.get_list()).await?;
    Ok(Json(users))
}

async fn update_user_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<User>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(user) = payload?;
    let store = state.store.clone();

    let updated = run_blocking(move || {
        require_affected(store.update(&user)?, &user.id)?;
        store.get_by_id(&user.id)
    })
    .await?;

    Ok(Json(updated))
}

async fn patch_user_handler(
    State(state): State<Arc<UserState>>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(patch) = payload?;
    let store = state.store.clone();

    let patched = run_blocking(move || {
        require_affected(store.patch(&patch)?, &patch.id)?;
        store.get_by_id(&patch.id)
    })
    .await?;

    Ok(Json(patched))
}

async fn delete_user_handler(
    State(state): State<Arc<UserState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    run_blocking(move || store.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
