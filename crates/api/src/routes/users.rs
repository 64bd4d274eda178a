//! User route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;
use tracing::instrument;

use ecommerce_core::UserId;

use super::MessageResponse;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::extract::{ApiPath, JsonBody};
use crate::models::{NewUser, User};
use crate::state::AppState;

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// List all users.
///
/// GET /users
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.store().list_users().await?))
}

/// Fetch a single user.
///
/// GET /users/{id}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<User>> {
    state
        .store()
        .get_user(id)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}

/// Create a user.
///
/// POST /users
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<User>)> {
    let new_user = NewUser::from_json(&body)?;
    let user = state.store().create_user(&new_user).await?;

    tracing::info!(user_id = %user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Replace a user's fields.
///
/// PUT /users/{id}
///
/// The id is checked before the body is parsed, so an unknown id is a 404
/// even when the body is malformed or missing.
#[instrument(skip(state, body))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
    body: std::result::Result<JsonBody<Value>, AppError>,
) -> Result<Json<User>> {
    if state.store().get_user(id).await?.is_none() {
        return Err(user_not_found());
    }

    let JsonBody(body) = body?;
    let new_user = NewUser::from_json(&body)?;
    let user = state
        .store()
        .update_user(id, &new_user)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => AppError::from(other),
        })?;

    tracing::info!(user_id = %user.id, "User updated");
    Ok(Json(user))
}

/// Delete a user.
///
/// DELETE /users/{id}
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<UserId>,
) -> Result<Json<MessageResponse>> {
    if !state.store().delete_user(id).await? {
        return Err(user_not_found());
    }

    tracing::info!(user_id = %id, "User deleted");
    Ok(Json(MessageResponse::new(format!(
        "successfully deleted user {id}"
    ))))
}
