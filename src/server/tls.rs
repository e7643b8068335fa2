//! TLS configuration for the webhook HTTPS listener
//!
//! Certificates are expected on disk, mounted from a `kubernetes.io/tls`
//! Secret (cert-manager or equivalent keeps them rotated). The webhook never
//! talks to the API server itself.

use std::io::BufReader;
use std::sync::Arc;

use thiserror::Error;

/// Default path of the mounted server certificate
pub const DEFAULT_TLS_CERT_PATH: &str = "/etc/varanto/tls/tls.crt";

/// Default path of the mounted private key
pub const DEFAULT_TLS_KEY_PATH: &str = "/etc/varanto/tls/tls.key";

/// Errors that can occur during TLS setup
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Failed to read {0}: {1}")]
    Read(String, #[source] std::io::Error),

    #[error("No certificates found in {0}")]
    NoCertificates(String),

    #[error("Failed to parse private key from {0}")]
    InvalidKey(String),

    #[error("Failed to build TLS config: {0}")]
    Config(String),
}

/// Filesystem locations of the PEM-encoded certificate chain and key
#[derive(Clone, Debug)]
pub struct CertificatePaths {
    pub cert: String,
    pub key: String,
}

impl CertificatePaths {
    /// Read paths from `VARANTO_TLS_CERT` / `VARANTO_TLS_KEY`, falling back
    /// to the standard Secret mount locations.
    pub fn from_env() -> Self {
        Self {
            cert: std::env::var("VARANTO_TLS_CERT")
                .unwrap_or_else(|_| DEFAULT_TLS_CERT_PATH.to_string()),
            key: std::env::var("VARANTO_TLS_KEY")
                .unwrap_or_else(|_| DEFAULT_TLS_KEY_PATH.to_string()),
        }
    }
}

/// Build a rustls ServerConfig from the mounted certificate pair
pub fn build_rustls_config(paths: &CertificatePaths) -> Result<Arc<rustls::ServerConfig>, TlsError> {
    use rustls::pki_types::CertificateDer;
    use rustls_pemfile::{certs, private_key};

    let cert_pem = std::fs::read(&paths.cert)
        .map_err(|e| TlsError::Read(paths.cert.clone(), e))?;
    let key_pem = std::fs::read(&paths.key).map_err(|e| TlsError::Read(paths.key.clone(), e))?;

    let cert_chain: Vec<CertificateDer<'static>> = certs(&mut BufReader::new(cert_pem.as_slice()))
        .filter_map(|r| r.ok())
        .collect();

    if cert_chain.is_empty() {
        return Err(TlsError::NoCertificates(paths.cert.clone()));
    }

    let key = private_key(&mut BufReader::new(key_pem.as_slice()))
        .map_err(|_| TlsError::InvalidKey(paths.key.clone()))?
        .ok_or_else(|| TlsError::InvalidKey(paths.key.clone()))?;

    // ring crypto provider, TLS 1.2+
    let config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()
    .map_err(|e| TlsError::Config(format!("protocol versions: {}", e)))?
    .with_no_client_auth()
    .with_single_cert(cert_chain, key)
    .map_err(|e| TlsError::Config(e.to_string()))?;

    Ok(Arc::new(config))
}

#[cfg(test)]
#[path = "tls_test.rs"]
mod tests;
