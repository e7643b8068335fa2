//! NodePool CRD types and version conversion
//!
//! - [`v1`] - current schema, storage version
//! - [`v1beta1`] - legacy schema, served for old clients
//! - [`conversion`] - bidirectional conversion engine between the two
//! - [`duration`] - the Go-style duration string both schemas use

pub mod conversion;
pub mod duration;
pub mod v1;
pub mod v1beta1;
