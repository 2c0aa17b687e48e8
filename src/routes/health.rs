use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use crate::error::ApiError;
use crate::server::AppState;

/// Home route handler.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/`
pub async fn home() -> Json<serde_json::Value> {
    Json(json!({ "message": "hello world from todo-server" }))
}

/// Liveness probe.
///
/// Always answers `{"alive": true}` while the process can serve requests.
/// Suitable for Docker/Kubernetes liveness checks and load balancers.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/health/live`
///
/// # Examples
/// ```bash
/// curl http://localhost:3000/health/live
/// # Response: {"alive":true}
/// ```
pub async fn live() -> Json<serde_json::Value> {
    Json(json!({ "alive": true }))
}

/// Readiness probe.
///
/// Checks the backing store before answering.
///
/// # HTTP Status Codes
/// - **200 OK**: storage reachable, `{"ready": true}`
/// - **503 Service Unavailable**: storage check failed
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    match state.health.health_check().await {
        Ok(()) => Ok(Json(json!({ "ready": true }))),
        Err(e) => {
            tracing::error!(error = %e, "readiness check failed");
            Err(ApiError::Unavailable)
        }
    }
}
