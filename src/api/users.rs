//! User resource endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::User;

/// GET /users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    debug!("Listing users");

    let users = state.user_service.list().await?;

    Ok(Json(users))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    debug!("Creating user");

    let user = state.user_service.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    debug!(user_id = %id, "Getting user");

    let user = state.user_service.get(&id).await?;

    Ok(Json(user))
}

/// PATCH /users/{id}
///
/// Only the fields present in the body are changed.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<User>, ApiError> {
    debug!(user_id = %id, "Updating user");

    let user = state.user_service.update(&id, &payload).await?;

    Ok(Json(user))
}

/// DELETE /users/{id}
///
/// Responds with the deleted record.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    debug!(user_id = %id, "Deleting user");

    let user = state.user_service.delete(&id).await?;

    Ok(Json(user))
}
