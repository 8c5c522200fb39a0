use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::timestamp;
use crate::dtos::{HealthResponse, ReadinessChecks, ReadyResponse};
use crate::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let health = HealthResponse {
        status: "healthy".to_string(),
        timestamp: timestamp(),
        uptime: state.uptime().as_secs_f64(),
        environment: state.config.environment,
        version: state.config.service_version.clone(),
    };

    tracing::info!(health = ?health, "Health check requested");
    (StatusCode::OK, Json(health))
}

/// Readiness probe. The service has no backing dependencies, so every check
/// reports `ok`.
pub async fn readiness_check() -> impl IntoResponse {
    let ready = ReadyResponse {
        status: "ready".to_string(),
        timestamp: timestamp(),
        checks: ReadinessChecks {
            database: "ok".to_string(),
            redis: "ok".to_string(),
            external_apis: "ok".to_string(),
        },
    };

    tracing::info!(ready = ?ready, "Readiness check requested");
    (StatusCode::OK, Json(ready))
}
