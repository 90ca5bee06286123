//! Health check endpoints

use axum::response::Json;

use crate::service::types::HealthResponse;

/// Service name reported by the namespaced health check
pub const SERVICE_NAME: &str = "PharmaCode API";

/// Minimal liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: None,
        service: None,
    })
}

/// Liveness check with timestamp and service name
pub async fn api_health_check() -> Json<HealthResponse> {
    let now = chrono::Utc::now();
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Some(now.timestamp_micros() as f64 / 1_000_000.0),
        service: Some(SERVICE_NAME.to_string()),
    })
}
