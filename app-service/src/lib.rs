pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use futures::Stream;
use service_core::lifecycle::{self, ShutdownOutcome, ShutdownSignal};
use service_core::middleware::{
    access_log::access_log_middleware, cors::cors_layer, panic::catch_panic_layer,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use config::AppConfig;

/// Read-only state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;
    let allowed_origins = state.config.security.allowed_origins.clone();

    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::not_found),
        )
        .route(
            "/ready",
            get(handlers::readiness_check).fallback(handlers::not_found),
        )
        .route("/", get(handlers::root).fallback(handlers::not_found))
        .route(
            "/api/info",
            get(handlers::api_info).fallback(handlers::not_found),
        )
        .route(
            "/api/echo",
            post(handlers::echo).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(catch_panic_layer())
        .layer(DefaultBodyLimit::max(body_limit))
        // Preflights are answered here, inside the logging and header layers.
        .layer(cors_layer(&allowed_origins))
        .layer(from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    config: Arc<AppConfig>,
}

impl Application {
    /// Bind `0.0.0.0:<port>` and assemble the router. Port 0 picks a free port.
    pub async fn build(config: AppConfig) -> anyhow::Result<Self> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            anyhow::anyhow!("Failed to bind to address {}: {}", addr, e)
        })?;
        let port = listener.local_addr()?.port();

        let state = AppState::new(config);
        let config = state.config.clone();
        let router = build_router(state);

        Ok(Self {
            port,
            listener,
            router,
            config,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGTERM or SIGINT, then drain.
    pub async fn run_until_stopped(self) -> anyhow::Result<ShutdownOutcome> {
        let signals = lifecycle::shutdown_signals().map_err(|e| {
            tracing::error!(error = %e, "Failed to install signal handlers");
            anyhow::anyhow!("Failed to install signal handlers: {}", e)
        })?;

        self.run_until(signals).await
    }

    /// Serve until the first item of `signals`, then drain. Later items can
    /// still cut the drain short.
    pub async fn run_until<S>(self, signals: S) -> anyhow::Result<ShutdownOutcome>
    where
        S: Stream<Item = ShutdownSignal> + Send + Unpin,
    {
        tracing::info!(
            port = self.port,
            environment = %self.config.environment,
            pid = std::process::id(),
            "Server started on port {}",
            self.port
        );

        let outcome = lifecycle::serve_until_signal(
            self.listener,
            self.router,
            signals,
            self.config.shutdown.drain_timeout,
        )
        .await?;

        Ok(outcome)
    }
}
