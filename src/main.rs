use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use varanto::crd::conversion::NodeClassRegistry;
use varanto::server::{
    build_rustls_config, run_health_server, run_health_server_tls, wait_for_signal,
    CertificatePaths, ReadinessState,
};

/// Default port for health endpoints (HTTP)
const HEALTH_PORT: u16 = 8080;

/// Default port for webhook endpoints (HTTPS)
const WEBHOOK_PORT: u16 = 8443;

/// Grace window between flipping readiness and exiting, so the Service
/// stops routing conversion requests to this pod first
const DRAIN_PERIOD: Duration = Duration::from_secs(3);

/// Check if webhook TLS is enabled via env var
fn is_webhook_tls_enabled() -> bool {
    std::env::var("VARANTO_WEBHOOK_TLS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting VARANTO NodePool conversion webhook");

    // Create readiness state (initially not ready)
    let readiness = ReadinessState::new();

    // Node class registry: populated once, read-only afterwards
    let registry = Arc::new(NodeClassRegistry::from_env());
    if registry.is_empty() {
        warn!("No node classes registered; conversions that need a default will fail");
    } else {
        info!(node_classes = registry.len(), "Node class registry initialized");
    }

    // Build TLS config up front so a bad mount fails the pod, not a request
    let webhook_tls_enabled = is_webhook_tls_enabled();
    let tls_config = if webhook_tls_enabled {
        let paths = CertificatePaths::from_env();
        info!(cert = %paths.cert, key = %paths.key, "Loading webhook TLS certificates");
        match build_rustls_config(&paths) {
            Ok(config) => {
                info!("Webhook TLS initialized successfully");
                Some(config)
            }
            Err(e) => {
                return Err(anyhow::anyhow!("TLS init error: {}", e));
            }
        }
    } else {
        info!("Webhook TLS disabled - running HTTP only");
        None
    };

    // Start the server in the background
    let server_readiness = readiness.clone();
    let server_registry = Arc::clone(&registry);
    let server_handle = if let Some(config) = tls_config {
        tokio::spawn(async move {
            if let Err(e) =
                run_health_server_tls(WEBHOOK_PORT, server_readiness, server_registry, config).await
            {
                warn!(error = %e, "HTTPS server failed");
            }
        })
    } else {
        tokio::spawn(async move {
            if let Err(e) = run_health_server(HEALTH_PORT, server_readiness, server_registry).await
            {
                warn!(error = %e, "HTTP server failed");
            }
        })
    };

    let server_port = if webhook_tls_enabled {
        WEBHOOK_PORT
    } else {
        HEALTH_PORT
    };
    let server_mode = if webhook_tls_enabled { "HTTPS" } else { "HTTP" };
    info!(port = server_port, mode = server_mode, "Server task spawned");

    // Ready to serve conversions
    readiness.set_ready();
    info!("Webhook ready");

    let signal = wait_for_signal().await;
    info!(signal = signal, "Shutting down");

    readiness.set_not_ready();
    tokio::time::sleep(DRAIN_PERIOD).await;
    server_handle.abort();

    info!("Shutdown complete");
    Ok(())
}
