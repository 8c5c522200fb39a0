//! One structured INFO event per request, carrying the fields of the
//! combined access log format.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

pub async fn access_log_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();
    let referrer = header_str(req.headers(), header::REFERER);
    let user_agent = header_str(req.headers(), header::USER_AGENT);

    let response = next.run(req).await;

    let content_length = header_str(response.headers(), header::CONTENT_LENGTH);

    tracing::info!(
        remote_addr = %remote_addr,
        method = %method,
        uri = %uri,
        version = ?version,
        status = response.status().as_u16(),
        content_length = %content_length,
        referrer = %referrer,
        user_agent = %user_agent,
        latency_ms = start.elapsed().as_secs_f64() * 1000.0,
        "{} {} {:?} {}",
        method,
        uri,
        version,
        response.status().as_u16()
    );

    response
}
