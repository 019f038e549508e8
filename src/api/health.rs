use crate::api::MgmtState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: checks the token table and the broadcast topic.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let (store_res, broker_res) =
        tokio::join!(state.health_service.check_store(), state.health_service.check_broker());

    let mut status_code = StatusCode::OK;
    let token_store = if let Err(e) = store_res {
        tracing::warn!(error = %e, component = "token_store", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let broker = if let Err(e) = broker_res {
        tracing::warn!(error = %e, component = "broker", "Readiness probe failed");
        status_code = StatusCode::SERVICE_UNAVAILABLE;
        "error"
    } else {
        "ok"
    };

    let response = HealthResponse {
        status: if status_code == StatusCode::OK { "ok" } else { "error" }.to_string(),
        token_store: token_store.to_string(),
        broker: broker.to_string(),
    };

    (status_code, Json(response))
}
