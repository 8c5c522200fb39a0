use axum::{extract::State, Json};
use service_core::error::AppError;

use super::timestamp;
use crate::dtos::{InfoResponse, RuntimeInfo, WelcomeResponse};
use crate::services::process_stats;
use crate::AppState;

pub async fn root(State(state): State<AppState>) -> Json<WelcomeResponse> {
    let response = WelcomeResponse {
        message: format!("Welcome to {}!", state.config.service_name),
        timestamp: timestamp(),
        environment: state.config.environment,
        version: state.config.service_version.clone(),
    };

    tracing::info!(response = ?response, "Root endpoint accessed");
    Json(response)
}

pub async fn api_info(State(state): State<AppState>) -> Result<Json<InfoResponse>, AppError> {
    let uptime = state.uptime();
    let snapshot = process_stats::sample(uptime)?;

    let info = InfoResponse {
        application: state.config.service_name.clone(),
        version: state.config.service_version.clone(),
        environment: state.config.environment,
        runtime: RuntimeInfo {
            rust_version: env!("APP_RUSTC_VERSION").to_string(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        },
        pid: snapshot.pid,
        uptime: uptime.as_secs_f64(),
        memory: snapshot.memory,
        cpu: snapshot.cpu,
    };

    tracing::info!(info = ?info, "Info endpoint accessed");
    Ok(Json(info))
}
