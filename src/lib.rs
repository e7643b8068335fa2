//! VARANTO - version conversion webhook for the NodePool CRD
//!
//! Serves the Kubernetes conversion webhook for `nodepools.varanto.io`,
//! translating between the v1 (storage) and v1beta1 (legacy) schemas.
//! The two schemas are not isomorphic; see [`crd::conversion`] for the
//! side-channel protocol that keeps round trips lossless.

pub mod crd;
pub mod server;
