//! Health check endpoint handlers.
//!
//! Provides health check endpoints for monitoring and load balancers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nest_persistence::core::ResourceStorage;
use tracing::{debug, warn};

use crate::error::RestResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/health`
///
/// # Response
///
/// - `200 OK` - Backend name and current timestamp
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> RestResult<Response>
where
    S: ResourceStorage + Send + Sync,
{
    debug!("Processing health check request");

    let backend_name = state.storage().backend_name();

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": backend_name,
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    Ok((StatusCode::OK, Json(health_response)).into_response())
}

/// Handler for a liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for a readiness probe.
///
/// Counts stored resources to confirm the backend answers.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
///
/// # Response
///
/// - `200 OK` - Storage answered
/// - `503 Service Unavailable` - Storage failed
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: ResourceStorage + Send + Sync,
{
    debug!("Processing readiness check request");

    let backend_name = state.storage().backend_name();

    match state.storage().count(None).await {
        Ok(resources) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "backend": backend_name,
                "resources": resources,
                "checks": {
                    "storage": "ok"
                }
            })),
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, "Storage readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unavailable",
                    "backend": backend_name,
                    "checks": {
                        "storage": err.to_string()
                    }
                })),
            )
                .into_response()
        }
    }
}
