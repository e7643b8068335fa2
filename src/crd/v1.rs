//! v1 NodePool types
//!
//! Current schema and storage version. Differences from v1beta1:
//! - `expireAfter` lives on the claim template, not under disruption
//! - `nodeClassRef` carries a split kind/group instead of a combined apiVersion
//! - requirements gain `minValues`; `terminationGracePeriod` is new
//! - the kubelet configuration block is gone (carried via annotation only)

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{NodeSelectorRequirement, Taint};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::duration::NillableDuration;

/// Annotation carrying the JSON-encoded v1beta1 kubelet configuration across
/// conversions. Ephemeral conversion state, not user-facing configuration.
pub const KUBELET_COMPATIBILITY_ANNOTATION: &str =
    "compatibility.varanto.io/v1beta1-kubelet-conversion";

/// Annotation carrying the exact v1beta1 `nodeClassRef` as the user wrote it,
/// before any defaulting. Ephemeral conversion state, not user-facing
/// configuration.
pub const NODE_CLASS_REFERENCE_ANNOTATION: &str =
    "compatibility.varanto.io/v1beta1-nodeclass-reference";

/// Aggregate resource ceilings across all nodes owned by a pool
pub type Limits = BTreeMap<String, Quantity>;

/// NodePool is a Custom Resource describing a pool of provisionable nodes
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    group = "varanto.io",
    version = "v1",
    kind = "NodePool",
    status = "NodePoolStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"NodeClass", "type":"string", "jsonPath":".spec.template.spec.nodeClassRef.name"}"#,
    printcolumn = r#"{"name":"Weight", "type":"integer", "jsonPath":".spec.weight"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
pub struct NodePoolSpec {
    /// Template for the node claims this pool stamps out
    pub template: NodeClaimTemplate,

    /// Controls for voluntary disruption of nodes owned by this pool
    #[serde(default)]
    pub disruption: Disruption,

    /// Resource ceilings; provisioning stops while any limit is exceeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,

    /// Priority when ranking pools during scheduling; higher wins ties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

/// Voluntary disruption controls
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Disruption {
    /// How long a node must be unneeded before it may be consolidated.
    /// Required; `0s` means consolidate immediately, `Never` disables it.
    #[serde(rename = "consolidateAfter")]
    pub consolidate_after: NillableDuration,

    /// Which nodes are candidates for consolidation
    #[serde(rename = "consolidationPolicy", default)]
    pub consolidation_policy: ConsolidationPolicy,
}

/// Consolidation candidate policy
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
pub enum ConsolidationPolicy {
    /// Only nodes with no running pods
    WhenEmpty,
    /// Empty nodes plus nodes whose pods fit elsewhere
    #[default]
    WhenEmptyOrUnderutilized,
}

/// Template applied to every node claim created by the pool
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodeClaimTemplate {
    #[serde(default)]
    pub metadata: TemplateMeta,
    pub spec: NodeClaimTemplateSpec,
}

/// Labels and annotations propagated to stamped-out node claims
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct TemplateMeta {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodeClaimTemplateSpec {
    /// Taints applied to provisioned nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,

    /// Taints applied only until a node reports ready, to keep ordinary pods
    /// off while daemons start
    #[serde(rename = "startupTaints", default, skip_serializing_if = "Vec::is_empty")]
    pub startup_taints: Vec<Taint>,

    /// Scheduling requirements constraining the nodes this pool may create
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<NodeSelectorRequirementWithMinValues>,

    /// Reference to the node class holding provider-specific machine config
    #[serde(rename = "nodeClassRef")]
    pub node_class_ref: NodeClassReference,

    /// How long a node lives before being replaced; `Never` disables expiry
    #[serde(rename = "expireAfter", default)]
    pub expire_after: NillableDuration,

    /// Grace period before a draining node is forcibly terminated, e.g. "30s".
    /// Not representable in v1beta1; dropped on conversion.
    #[serde(
        rename = "terminationGracePeriod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub termination_grace_period: Option<String>,
}

/// A node selector requirement plus the minimum number of distinct values
/// the scheduler must keep available for the key
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodeSelectorRequirementWithMinValues {
    #[serde(flatten)]
    pub requirement: NodeSelectorRequirement,

    /// Minimum distinct values for the key; unset means no minimum.
    /// Not representable in v1beta1; dropped on conversion.
    #[serde(rename = "minValues", default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<i32>,
}

/// Reference to a node class object
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct NodeClassReference {
    /// Kind of the referent
    pub kind: String,

    /// Name of the referent
    pub name: String,

    /// API group of the referent
    pub group: String,
}

/// Observed state of the pool
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodePoolStatus {
    /// Total resources of all nodes currently owned by the pool
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Quantity>,
}

#[cfg(test)]
#[path = "v1_test.rs"]
mod tests;
