//! HTTP serving for the conversion webhook
//!
//! Provides the Kubernetes-facing surface:
//! - `/healthz` / `/readyz` probes
//! - `/convert` ConversionReview endpoint (HTTPS in-cluster)
//!
//! Plus TLS setup from mounted certificates and signal handling for
//! graceful shutdown.

mod health;
pub mod shutdown;
pub mod tls;
pub mod webhook;

pub use health::{run_health_server, run_health_server_tls, ReadinessState, ServerState};
pub use shutdown::wait_for_signal;
pub use tls::{build_rustls_config, CertificatePaths, TlsError};

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;
