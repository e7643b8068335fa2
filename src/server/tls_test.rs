//! Tests for TLS configuration loading

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use std::path::PathBuf;

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("varanto-tls-test-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).expect("failed to write scratch file");
    path
}

#[test]
fn test_default_paths() {
    // only exercise the fallback; setting env vars races parallel tests
    assert_eq!(DEFAULT_TLS_CERT_PATH, "/etc/varanto/tls/tls.crt");
    assert_eq!(DEFAULT_TLS_KEY_PATH, "/etc/varanto/tls/tls.key");
}

#[test]
fn test_missing_cert_file_is_a_read_error() {
    let paths = CertificatePaths {
        cert: "/nonexistent/varanto/tls.crt".to_string(),
        key: "/nonexistent/varanto/tls.key".to_string(),
    };

    let err = build_rustls_config(&paths).unwrap_err();
    assert!(matches!(err, TlsError::Read(path, _) if path.contains("tls.crt")));
}

#[test]
fn test_garbage_pem_yields_no_certificates() {
    let cert = scratch_file("garbage.crt", "this is not pem data");
    let key = scratch_file("garbage.key", "neither is this");

    let paths = CertificatePaths {
        cert: cert.to_string_lossy().into_owned(),
        key: key.to_string_lossy().into_owned(),
    };

    let err = build_rustls_config(&paths).unwrap_err();
    assert!(matches!(err, TlsError::NoCertificates(_)));

    let _ = std::fs::remove_file(cert);
    let _ = std::fs::remove_file(key);
}
