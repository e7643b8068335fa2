//! Tests for health endpoints

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::crd::conversion::NodeClassRegistry;
use std::sync::Arc;
use std::time::Duration;

fn registry() -> Arc<NodeClassRegistry> {
    Arc::new(NodeClassRegistry::new(vec![]))
}

/// Wait for the server to be ready with retry logic
///
/// Retries the connection with exponential backoff; more reliable than a
/// fixed sleep in test environments.
async fn wait_for_server(port: u16, max_retries: u32) -> reqwest::Client {
    let client = reqwest::Client::new();
    let mut delay = Duration::from_millis(10);

    for attempt in 1..=max_retries {
        match client
            .get(format!("http://127.0.0.1:{}/healthz", port))
            .timeout(Duration::from_millis(100))
            .send()
            .await
        {
            Ok(_) => return client,
            Err(_) if attempt < max_retries => {
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, Duration::from_millis(200));
            }
            Err(e) => panic!("Server not ready after {} attempts: {}", max_retries, e),
        }
    }
    client
}

#[tokio::test]
async fn test_healthz_returns_200() {
    let readiness = ReadinessState::new();
    let port = 19080; // high ports to avoid collisions across parallel tests

    let server_readiness = readiness.clone();
    let server_handle =
        tokio::spawn(async move { run_health_server(port, server_readiness, registry()).await });

    let client = wait_for_server(port, 10).await;

    let response = client
        .get(format!("http://127.0.0.1:{}/healthz", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("failed to connect to health server");

    assert_eq!(response.status(), 200, "liveness probe should return 200");

    server_handle.abort();
}

#[tokio::test]
async fn test_readyz_returns_503_when_not_ready() {
    let readiness = ReadinessState::new();
    assert!(!readiness.is_ready(), "should start as not ready");

    let port = 19081;
    let server_readiness = readiness.clone();
    let server_handle =
        tokio::spawn(async move { run_health_server(port, server_readiness, registry()).await });

    let client = wait_for_server(port, 10).await;

    let response = client
        .get(format!("http://127.0.0.1:{}/readyz", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("failed to connect to health server");

    assert_eq!(
        response.status(),
        503,
        "readiness probe should return 503 when not ready"
    );

    server_handle.abort();
}

#[tokio::test]
async fn test_readyz_returns_200_when_ready() {
    let readiness = ReadinessState::new();
    readiness.set_ready();

    let port = 19082;
    let server_readiness = readiness.clone();
    let server_handle =
        tokio::spawn(async move { run_health_server(port, server_readiness, registry()).await });

    let client = wait_for_server(port, 10).await;

    let response = client
        .get(format!("http://127.0.0.1:{}/readyz", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("failed to connect to health server");

    assert_eq!(
        response.status(),
        200,
        "readiness probe should return 200 when ready"
    );

    server_handle.abort();
}

#[test]
fn test_readiness_state_transitions() {
    let state = ReadinessState::new();

    assert!(!state.is_ready());

    state.set_ready();
    assert!(state.is_ready());

    // clones share state; shutdown flips all of them
    let cloned = state.clone();
    state.set_not_ready();
    assert!(!cloned.is_ready());
}
