//! Node claim template conversion
//!
//! Taints, startup taints and template metadata are structurally identical
//! in both versions and copy verbatim. Requirements map element-wise, with
//! `minValues` dropped toward v1beta1 and left unset toward v1. The kubelet
//! configuration exists only in v1beta1 and crosses via the side channel.

use crate::crd::v1::{self, KUBELET_COMPATIBILITY_ANNOTATION};
use crate::crd::v1beta1;

use super::{annotations, class_ref, ConvertError, NodeClassRegistry};

/// Convert a v1 claim template to v1beta1.
///
/// `kubelet_stash` and `ref_stash` are the raw compatibility blobs read off
/// the source object's annotations, if present.
pub fn to_v1beta1(
    template: &v1::NodeClaimTemplate,
    kubelet_stash: Option<&str>,
    ref_stash: Option<&str>,
) -> Result<v1beta1::NodeClaimTemplate, ConvertError> {
    let kubelet = kubelet_stash
        .map(|raw| annotations::decode(KUBELET_COMPATIBILITY_ANNOTATION, raw))
        .transpose()?;

    Ok(v1beta1::NodeClaimTemplate {
        metadata: template.metadata.clone(),
        spec: v1beta1::NodeClaimSpec {
            taints: template.spec.taints.clone(),
            startup_taints: template.spec.startup_taints.clone(),
            requirements: template
                .spec
                .requirements
                .iter()
                // minValues has no v1beta1 counterpart and is dropped
                .map(|r| r.requirement.clone())
                .collect(),
            kubelet,
            node_class_ref: class_ref::to_v1beta1(&template.spec.node_class_ref, ref_stash)?,
        },
    })
}

/// Convert a v1beta1 claim template to v1.
///
/// Returns the template together with the side-channel blobs the caller
/// attaches to the produced object: the kubelet configuration when the
/// legacy template carried one (`None` tells the caller to clear any stale
/// annotation), and the exact node class reference, always.
///
/// `expireAfter` is left at its default; it lives under disruption on the
/// v1beta1 side and the caller relocates it. `terminationGracePeriod` has
/// no legacy counterpart and stays unset.
pub fn from_v1beta1(
    template: &v1beta1::NodeClaimTemplate,
    registry: &NodeClassRegistry,
) -> Result<(v1::NodeClaimTemplate, Option<String>, String), ConvertError> {
    let (node_class_ref, ref_blob) =
        class_ref::from_v1beta1(&template.spec.node_class_ref, registry)?;

    let kubelet_blob = template
        .spec
        .kubelet
        .as_ref()
        .map(|kubelet| annotations::encode(KUBELET_COMPATIBILITY_ANNOTATION, kubelet))
        .transpose()?;

    let converted = v1::NodeClaimTemplate {
        metadata: template.metadata.clone(),
        spec: v1::NodeClaimTemplateSpec {
            taints: template.spec.taints.clone(),
            startup_taints: template.spec.startup_taints.clone(),
            requirements: template
                .spec
                .requirements
                .iter()
                .map(|r| v1::NodeSelectorRequirementWithMinValues {
                    requirement: r.clone(),
                    min_values: None,
                })
                .collect(),
            node_class_ref,
            expire_after: Default::default(),
            termination_grace_period: None,
        },
    };

    Ok((converted, kubelet_blob, ref_blob))
}

#[cfg(test)]
#[path = "template_test.rs"]
mod tests;
