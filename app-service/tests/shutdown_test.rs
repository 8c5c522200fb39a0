mod common;

use common::{test_config, TestApp};
use service_core::lifecycle::{ShutdownOutcome, ShutdownSignal};
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;

#[tokio::test]
async fn terminate_drains_and_reports_clean_exit() {
    let app = TestApp::spawn().await;
    let address = format!("127.0.0.1:{}", app.port);

    let started = Instant::now();
    let outcome = app.shutdown(ShutdownSignal::Terminate).await;

    assert_eq!(outcome, ShutdownOutcome::Drained(ShutdownSignal::Terminate));
    assert_eq!(outcome.exit_code(), 0);
    assert!(started.elapsed() < Duration::from_secs(30));

    // New connections are refused once the server has stopped.
    assert!(tokio::net::TcpStream::connect(&address).await.is_err());
}

#[tokio::test]
async fn interrupt_drains_and_reports_clean_exit() {
    let app = TestApp::spawn().await;

    let outcome = app.shutdown(ShutdownSignal::Interrupt).await;

    assert_eq!(outcome, ShutdownOutcome::Drained(ShutdownSignal::Interrupt));
    assert_eq!(outcome.exit_code(), 0);
}

#[tokio::test]
async fn requests_served_before_shutdown_complete() {
    let mut config = test_config();
    config.shutdown.drain_timeout = Duration::from_secs(2);
    let app = TestApp::spawn_with(config).await;

    let response = app
        .client()
        .post(app.url("/api/echo"))
        .json(&serde_json::json!({ "message": "last words" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);

    let outcome = app.shutdown(ShutdownSignal::Terminate).await;
    assert_eq!(outcome, ShutdownOutcome::Drained(ShutdownSignal::Terminate));
}

/// Open a connection and send a POST /api/echo whose body never completes.
async fn stalled_echo(app: &TestApp) -> tokio::net::TcpStream {
    let mut stream = tokio::net::TcpStream::connect(("127.0.0.1", app.port))
        .await
        .expect("Failed to connect");
    stream
        .write_all(
            b"POST /api/echo HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"message\":",
        )
        .await
        .expect("Failed to write request");
    stream
}

#[tokio::test]
async fn terminate_after_interrupt_forces_exit() {
    let mut config = test_config();
    config.shutdown.drain_timeout = Duration::from_millis(300);
    let app = TestApp::spawn_with(config).await;

    let _stalled = stalled_echo(&app).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    app.signal(ShutdownSignal::Interrupt);
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(app.is_running(), "interrupt drain has no deadline");

    let started = Instant::now();
    app.signal(ShutdownSignal::Terminate);
    let outcome = app.stopped().await;

    assert_eq!(outcome, ShutdownOutcome::TimedOut(ShutdownSignal::Terminate));
    assert_eq!(outcome.exit_code(), 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn stalled_request_times_out_terminate_drain() {
    let mut config = test_config();
    config.shutdown.drain_timeout = Duration::from_millis(300);
    let app = TestApp::spawn_with(config).await;

    let _stalled = stalled_echo(&app).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let outcome = app.shutdown(ShutdownSignal::Terminate).await;
    assert_eq!(outcome, ShutdownOutcome::TimedOut(ShutdownSignal::Terminate));
}
