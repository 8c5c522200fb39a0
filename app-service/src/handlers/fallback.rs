use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{Method, Uri},
};
use service_core::error::AppError;

/// Catch-all for unknown paths and for known paths hit with the wrong method.
pub async fn not_found(
    method: Method,
    uri: Uri,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> AppError {
    let ip = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::warn!(url = %uri, method = %method, ip = %ip, "404 - Not Found");
    AppError::NotFound
}
