use crate::domain::token::RecordRejection;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Malformed query result: {0}")]
    MalformedQuery(&'static str),
    #[error("Invalid token record: {0}")]
    InvalidRecord(#[from] RecordRejection),
    #[error("Provider error: {0}")]
    Provider(#[source] anyhow::Error),
    #[error("Message construction failed: {0}")]
    Message(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Wraps an SDK or transport failure from an external collaborator.
    pub fn provider<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Config(msg) => {
                tracing::error!(message = %msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Self::MalformedQuery(what) => {
                tracing::error!(detail = %what, "Token store returned a malformed query result");
                (StatusCode::BAD_GATEWAY, "Upstream error".to_string())
            }
            Self::InvalidRecord(rejection) => {
                tracing::error!(reason = %rejection, "Token store returned an invalid record");
                (StatusCode::BAD_GATEWAY, "Upstream error".to_string())
            }
            Self::Provider(e) => {
                tracing::error!(error = ?e, "Provider call failed");
                (StatusCode::BAD_GATEWAY, "Upstream error".to_string())
            }
            Self::Message(msg) => {
                tracing::error!(message = %msg, "Failed to build push message");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Not found".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
