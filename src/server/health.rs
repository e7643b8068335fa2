//! HTTP server for health and webhook endpoints
//!
//! - `/healthz` - Liveness: Is the process alive?
//! - `/readyz` - Readiness: Is the webhook ready to handle requests?
//! - `/convert` - CRD conversion webhook (v1 <-> v1beta1)

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

use crate::crd::conversion::NodeClassRegistry;

/// Shared state for readiness tracking
///
/// Flipped to ready once startup completes, and back to not-ready during
/// shutdown so Kubernetes stops routing traffic before the process exits.
#[derive(Debug, Clone)]
pub struct ReadinessState {
    ready: Arc<std::sync::atomic::AtomicBool>,
}

impl ReadinessState {
    /// Create a new readiness state (initially not ready)
    pub fn new() -> Self {
        Self {
            ready: Arc::new(std::sync::atomic::AtomicBool::new(false)),
        }
    }

    /// Mark the webhook as ready
    pub fn set_ready(&self) {
        self.ready.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    /// Mark the webhook as not ready; the readiness probe then returns 503
    pub fn set_not_ready(&self) {
        self.ready.store(false, std::sync::atomic::Ordering::SeqCst);
    }

    /// Check if the webhook is ready
    pub fn is_ready(&self) -> bool {
        self.ready.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

/// Combined server state for the health and conversion endpoints
#[derive(Clone)]
pub struct ServerState {
    readiness: ReadinessState,
    registry: Arc<NodeClassRegistry>,
}

impl ServerState {
    pub fn new(readiness: ReadinessState, registry: Arc<NodeClassRegistry>) -> Self {
        Self {
            readiness,
            registry,
        }
    }

    /// The node class registry conversions default from
    pub fn registry(&self) -> Arc<NodeClassRegistry> {
        Arc::clone(&self.registry)
    }
}

/// Liveness probe handler
///
/// Always returns 200 OK - if this responds, the process is alive.
async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe handler
///
/// Returns 200 OK if ready, 503 Service Unavailable if not.
async fn readyz(State(state): State<ServerState>) -> StatusCode {
    if state.readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Build the router for health and webhook endpoints
fn build_router(readiness: ReadinessState, registry: Arc<NodeClassRegistry>) -> Router {
    let state = ServerState::new(readiness, registry);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/convert", post(super::webhook::handle_convert))
        .with_state(state)
}

/// Run the server on the specified port (HTTP, no TLS)
///
/// Runs forever until the task is aborted. The plain-HTTP variant exists for
/// local development and probe serving; the API server only talks HTTPS.
pub async fn run_health_server(
    port: u16,
    readiness: ReadinessState,
    registry: Arc<NodeClassRegistry>,
) -> Result<(), std::io::Error> {
    let app = build_router(readiness, registry);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    // Log after successful bind - server is actually listening
    info!(port = %port, "Health and webhook server listening (HTTP)");

    axum::serve(listener, app)
        .await
        .map_err(std::io::Error::other)
}

/// Run the server with TLS (HTTPS)
///
/// Used in-cluster: the API server requires the conversion webhook to be
/// served over TLS with a certificate it trusts.
pub async fn run_health_server_tls(
    port: u16,
    readiness: ReadinessState,
    registry: Arc<NodeClassRegistry>,
    tls_config: Arc<rustls::ServerConfig>,
) -> Result<(), std::io::Error> {
    use axum_server::tls_rustls::RustlsConfig;

    let app = build_router(readiness, registry);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let config = RustlsConfig::from_config(tls_config);

    info!(port = %port, "Health and webhook server listening (HTTPS)");

    axum_server::bind_rustls(addr, config)
        .serve(app.into_make_service())
        .await
}
