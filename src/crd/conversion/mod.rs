//! CRD version conversion between v1 and v1beta1
//!
//! Provides bidirectional conversion for the NodePool CRD. The schemas are
//! not isomorphic, so fields without a home in the target version ride along
//! in compatibility annotations on the v1 object:
//!
//! - the v1beta1 kubelet configuration block, and
//! - the v1beta1 `nodeClassRef` exactly as the user wrote it, so converting
//!   back restores blank kind/apiVersion instead of the defaulted values.
//!
//! ## Conversion rules
//! - v1 -> v1beta1: policy `WhenEmptyOrUnderutilized` collapses to
//!   `WhenUnderutilized` with `consolidateAfter` dropped; `expireAfter` moves
//!   from the template to disruption; `minValues` and
//!   `terminationGracePeriod` are dropped (not representable); the
//!   compatibility annotations are consumed and stripped from the result.
//! - v1beta1 -> v1: `WhenUnderutilized` expands to
//!   `WhenEmptyOrUnderutilized` with an explicit `0s` consolidateAfter;
//!   blank nodeClassRef kind/apiVersion are defaulted from the registry;
//!   the compatibility annotations are (re)written on the result.

pub mod annotations;
pub mod class_ref;
pub mod disruption;
pub mod template;

use thiserror::Error;

use super::v1::{self, KUBELET_COMPATIBILITY_ANNOTATION, NODE_CLASS_REFERENCE_ANNOTATION};
use super::v1beta1;
pub use class_ref::{NodeClassKind, NodeClassRegistry};

/// Errors surfaced by a conversion; any of these fails the whole object.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A value destined for a compatibility annotation failed to serialize
    #[error("encoding {0} annotation: {1}")]
    Encoding(&'static str, #[source] serde_json::Error),

    /// A compatibility annotation held JSON that no longer deserializes
    #[error("decoding {0} annotation: {1}")]
    Decoding(&'static str, #[source] serde_json::Error),

    /// A default node class was required but the registry has no entries
    #[error("no default node class registered")]
    MissingDefault,
}

/// Convert a v1 NodePool to v1beta1
///
/// Metadata and status are carried verbatim, minus the compatibility
/// annotations: those are carriers for the conversion itself and are never
/// legitimate v1beta1 metadata.
pub fn convert_to_v1beta1(nodepool: &v1::NodePool) -> Result<v1beta1::NodePool, ConvertError> {
    let kubelet_stash = annotations::load(&nodepool.metadata, KUBELET_COMPATIBILITY_ANNOTATION);
    let ref_stash = annotations::load(&nodepool.metadata, NODE_CLASS_REFERENCE_ANNOTATION);

    let mut legacy_disruption = disruption::to_v1beta1(&nodepool.spec.disruption);
    // v1 keeps expiry on the claim template; v1beta1 keeps it under disruption
    legacy_disruption.expire_after = nodepool.spec.template.spec.expire_after;

    let mut converted = v1beta1::NodePool {
        metadata: nodepool.metadata.clone(),
        spec: v1beta1::NodePoolSpec {
            template: template::to_v1beta1(&nodepool.spec.template, kubelet_stash, ref_stash)?,
            disruption: legacy_disruption,
            limits: nodepool.spec.limits.clone(),
            weight: nodepool.spec.weight,
        },
        status: nodepool.status.clone(),
    };

    annotations::remove(
        &mut converted.metadata,
        &[
            KUBELET_COMPATIBILITY_ANNOTATION,
            NODE_CLASS_REFERENCE_ANNOTATION,
        ],
    );
    Ok(converted)
}

/// Convert a v1beta1 NodePool to v1
///
/// The registry supplies the default node class kind/group when the source
/// reference leaves them blank. Metadata and status are carried verbatim;
/// the compatibility annotations on the result are reconciled so they always
/// reflect this conversion, never a stale earlier one.
pub fn convert_from_v1beta1(
    nodepool: &v1beta1::NodePool,
    registry: &NodeClassRegistry,
) -> Result<v1::NodePool, ConvertError> {
    let (mut claim_template, kubelet_blob, ref_blob) =
        template::from_v1beta1(&nodepool.spec.template, registry)?;
    claim_template.spec.expire_after = nodepool.spec.disruption.expire_after;

    let mut converted = v1::NodePool {
        metadata: nodepool.metadata.clone(),
        spec: v1::NodePoolSpec {
            template: claim_template,
            disruption: disruption::from_v1beta1(&nodepool.spec.disruption),
            limits: nodepool.spec.limits.clone(),
            weight: nodepool.spec.weight,
        },
        status: nodepool.status.clone(),
    };

    match kubelet_blob {
        Some(blob) => {
            annotations::insert_raw(&mut converted.metadata, KUBELET_COMPATIBILITY_ANNOTATION, blob)
        }
        None => annotations::remove(&mut converted.metadata, &[KUBELET_COMPATIBILITY_ANNOTATION]),
    }
    annotations::insert_raw(
        &mut converted.metadata,
        NODE_CLASS_REFERENCE_ANNOTATION,
        ref_blob,
    );
    Ok(converted)
}

#[cfg(test)]
#[path = "conversion_test.rs"]
mod tests;
