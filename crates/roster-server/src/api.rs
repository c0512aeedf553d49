//! API handlers for the roster server.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use roster_db::User;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Request body for user creation.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name for the new user.
    pub name: String,
}

/// Response body listing users.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// All users, in insertion order.
    pub users: Vec<User>,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<roster_db::UserStoreError> for ApiError {
    fn from(e: roster_db::UserStoreError) -> Self {
        ApiError::InternalServerError(e.to_string())
    }
}

fn get_conn(state: &AppState) -> Result<roster_db::DbConn, ApiError> {
    state
        .pool
        .get()
        .map_err(|e| ApiError::InternalServerError(format!("database unavailable: {e}")))
}

/// Handler for `GET /api/users`.
///
/// Returns all users in insertion order.
pub async fn list_users_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let conn = get_conn(&state)?;
    let users = roster_db::list_users(&conn)?;
    Ok(Json(ListUsersResponse { users }))
}

/// Handler for `GET /api/users/{id}`.
pub async fn get_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let conn = get_conn(&state)?;
    let user = roster_db::get_user(&conn, id)?
        .ok_or_else(|| ApiError::NotFound(format!("no user with id {id}")))?;
    Ok(Json(user))
}

/// Handler for `POST /api/users`.
///
/// Creates a user from the request body. Names must be non-empty after
/// trimming.
pub async fn create_user_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name cannot be empty".to_string()));
    }

    let conn = get_conn(&state)?;
    let user = roster_db::insert_user(&conn, name)?;

    tracing::info!(id = user.id, "created user");
    Ok((StatusCode::CREATED, Json(user)).into_response())
}
