//! # General Route Handlers

use crate::types::HealthResponse;
use axum::Json;

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
    })
}
