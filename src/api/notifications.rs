use crate::api::AppState;
use crate::api::schemas::notifications::{AllTopicPushRequest, PlatformPushRequest};
use crate::domain::push::PushResult;
use crate::error::{AppError, Result};
use axum::{Json, extract::State};

/// Pushes a message to a single device endpoint.
///
/// Responds with `null` when the platform is unsupported or the broker returned no message id.
///
/// # Errors
/// Returns `AppError::BadRequest` if the payload is invalid.
/// Returns `AppError::Provider` if the broker call fails.
pub async fn push_to_platform(
    State(state): State<AppState>,
    Json(payload): Json<PlatformPushRequest>,
) -> Result<Json<Option<PushResult>>> {
    payload.validate().map_err(AppError::BadRequest)?;
    let result =
        state.notification_service.push_to_platform(&payload.message_payload, &payload.endpoint_payload).await?;
    Ok(Json(result))
}

/// Pushes a message to every device subscribed to the broadcast topic.
///
/// # Errors
/// Returns `AppError::BadRequest` if the payload is invalid.
/// Returns `AppError::Provider` if the broker call fails.
pub async fn push_to_all_topic(
    State(state): State<AppState>,
    Json(payload): Json<AllTopicPushRequest>,
) -> Result<Json<Option<PushResult>>> {
    payload.validate().map_err(AppError::BadRequest)?;
    let result = state.notification_service.push_to_all_topic(&payload.message_payload).await?;
    Ok(Json(result))
}
