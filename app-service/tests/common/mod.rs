//! Test helpers shared by the app-service integration tests.

#![allow(dead_code)]

use app_service::config::{AppConfig, Environment};
use app_service::{build_router, AppState, Application};
use axum::body::{to_bytes, Body};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use service_core::lifecycle::{ShutdownOutcome, ShutdownSignal};
use std::time::Duration;
use futures::channel::mpsc;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.common.port = 0;
    config.environment = Environment::Test;
    config.service_name = "app-service-test".to_string();
    config.shutdown.drain_timeout = Duration::from_secs(5);
    config
}

pub fn test_router(config: AppConfig) -> Router {
    build_router(AppState::new(config))
}

/// Send one request through the router without a socket.
pub async fn send(
    router: Router,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = router.oneshot(request).await.expect("Router failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).expect("Response body is not JSON");
    (status, headers, body)
}

/// A running server on an ephemeral port.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    signals: mpsc::UnboundedSender<ShutdownSignal>,
    handle: Option<JoinHandle<anyhow::Result<ShutdownOutcome>>>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);
        let (tx, rx) = mpsc::unbounded::<ShutdownSignal>();

        let handle = tokio::spawn(app.run_until(rx));

        // Wait for the server to answer
        let client = Self::http_client();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            port,
            signals: tx,
            handle: Some(handle),
        }
    }

    /// A client that does not keep idle connections around, so a drain is
    /// never held up by the test's own connection pool.
    pub fn http_client() -> reqwest::Client {
        reqwest::Client::builder()
            .pool_max_idle_per_host(0)
            .build()
            .expect("Failed to build HTTP client")
    }

    pub fn client(&self) -> reqwest::Client {
        Self::http_client()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Deliver `signal` without waiting for the server.
    pub fn signal(&self, signal: ShutdownSignal) {
        self.signals
            .unbounded_send(signal)
            .expect("Server already stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the server to finish draining.
    pub async fn stopped(mut self) -> ShutdownOutcome {
        self.handle
            .take()
            .expect("Server handle missing")
            .await
            .expect("Server task panicked")
            .expect("Server returned an error")
    }

    /// Deliver `signal` and wait for the server to finish draining.
    pub async fn shutdown(self, signal: ShutdownSignal) -> ShutdownOutcome {
        self.signal(signal);
        self.stopped().await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
