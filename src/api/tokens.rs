use crate::api::AppState;
use crate::api::schemas::tokens::{TokenBatchRequest, UserBatchRequest};
use crate::domain::token::{DeviceToken, UserToken};
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// # Errors
/// Returns `AppError::NotFound` if the user has no registered token.
pub async fn get_token_by_user(State(state): State<AppState>, Path(user_id): Path<String>) -> Result<Json<UserToken>> {
    state.token_service.get_token_by_user(&user_id).await?.map(Json).ok_or(AppError::NotFound)
}

/// # Errors
/// Returns `AppError::NotFound` if the device token is not registered.
pub async fn get_user_by_token(
    State(state): State<AppState>,
    Path(device_token): Path<String>,
) -> Result<Json<DeviceToken>> {
    state.token_service.get_user_by_token(&device_token).await?.map(Json).ok_or(AppError::NotFound)
}

/// # Errors
/// Returns `AppError::BadRequest` if the batch is too large.
pub async fn find_tokens_by_users(
    State(state): State<AppState>,
    Json(payload): Json<UserBatchRequest>,
) -> Result<Json<Vec<UserToken>>> {
    payload.validate().map_err(AppError::BadRequest)?;
    Ok(Json(state.token_service.find_tokens_by_users(&payload.user_ids).await?))
}

/// # Errors
/// Returns `AppError::BadRequest` if the batch is too large.
pub async fn find_users_by_tokens(
    State(state): State<AppState>,
    Json(payload): Json<TokenBatchRequest>,
) -> Result<Json<Vec<DeviceToken>>> {
    payload.validate().map_err(AppError::BadRequest)?;
    Ok(Json(state.token_service.find_users_by_tokens(&payload.device_tokens).await?))
}

/// Deletes the relation without checking that it exists.
pub async fn delete_user(
    State(state): State<AppState>,
    Path((device_token, user_id)): Path<(String, String)>,
) -> Result<StatusCode> {
    state.token_service.delete_user(&device_token, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
