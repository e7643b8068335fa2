//! v1beta1 NodePool types
//!
//! Legacy schema, still served for old clients. Differences from v1:
//! - `expireAfter` lives under disruption, not on the claim template
//! - `consolidateAfter` is optional and only meaningful with `WhenEmpty`
//! - `nodeClassRef` uses a combined `apiVersion`; kind/apiVersion may be blank
//! - the claim spec carries a structured kubelet configuration
//! - no `minValues` on requirements, no `terminationGracePeriod`

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{NodeSelectorRequirement, Taint};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::duration::NillableDuration;

// Re-export types that are identical in both versions
pub use super::v1::{Limits, NodePoolStatus, TemplateMeta};

/// NodePool v1beta1 - legacy shape of the pool resource
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    group = "varanto.io",
    version = "v1beta1",
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

/// Voluntary disruption controls (v1beta1 keeps expiry here)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct Disruption {
    /// How long a node must be unneeded before it may be consolidated.
    /// Absent with `WhenUnderutilized`; otherwise a duration or `Never`.
    #[serde(
        rename = "consolidateAfter",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub consolidate_after: Option<NillableDuration>,

    /// Which nodes are candidates for consolidation
    #[serde(rename = "consolidationPolicy", default)]
    pub consolidation_policy: ConsolidationPolicy,

    /// How long a node lives before being replaced; `Never` disables expiry
    #[serde(rename = "expireAfter", default)]
    pub expire_after: NillableDuration,
}

/// Consolidation candidate policy (legacy naming)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, JsonSchema)]
pub enum ConsolidationPolicy {
    /// Only nodes with no running pods
    WhenEmpty,
    /// Nodes whose pods fit elsewhere, empty ones included
    #[default]
    WhenUnderutilized,
}

/// Template applied to every node claim created by the pool
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodeClaimTemplate {
    #[serde(default)]
    pub metadata: TemplateMeta,
    pub spec: NodeClaimSpec,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct NodeClaimSpec {
    /// Taints applied to provisioned nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,

    /// Taints applied only until a node reports ready
    #[serde(rename = "startupTaints", default, skip_serializing_if = "Vec::is_empty")]
    pub startup_taints: Vec<Taint>,

    /// Scheduling requirements constraining the nodes this pool may create
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<NodeSelectorRequirement>,

    /// Kubelet overrides applied to nodes at registration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubelet: Option<KubeletConfiguration>,

    /// Reference to the node class holding provider-specific machine config
    #[serde(rename = "nodeClassRef")]
    pub node_class_ref: NodeClassReference,
}

/// Reference to a node class object; kind and apiVersion may be left blank,
/// in which case the cluster default node class is assumed
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq, JsonSchema)]
pub struct NodeClassReference {
    /// Kind of the referent; empty means the cluster default kind
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Name of the referent
    pub name: String,

    /// API version of the referent; empty means the cluster default group
    #[serde(rename = "apiVersion", default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
}

/// Kubelet settings a pool may override per node
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, JsonSchema)]
pub struct KubeletConfiguration {
    /// DNS servers handed to pods, overriding cluster defaults
    #[serde(rename = "clusterDNS", default, skip_serializing_if = "Vec::is_empty")]
    pub cluster_dns: Vec<String>,

    /// Maximum pods schedulable on the node
    #[serde(rename = "maxPods", default, skip_serializing_if = "Option::is_none")]
    pub max_pods: Option<i32>,

    /// Maximum pods per core; zero disables the limit
    #[serde(rename = "podsPerCore", default, skip_serializing_if = "Option::is_none")]
    pub pods_per_core: Option<i32>,

    /// Resources reserved for system daemons
    #[serde(
        rename = "systemReserved",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub system_reserved: BTreeMap<String, String>,

    /// Resources reserved for Kubernetes components
    #[serde(
        rename = "kubeReserved",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub kube_reserved: BTreeMap<String, String>,

    /// Hard eviction thresholds, e.g. {"memory.available": "5%"}
    #[serde(
        rename = "evictionHard",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub eviction_hard: BTreeMap<String, String>,

    /// Soft eviction thresholds
    #[serde(
        rename = "evictionSoft",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub eviction_soft: BTreeMap<String, String>,

    /// Grace periods paired with soft eviction thresholds
    #[serde(
        rename = "evictionSoftGracePeriod",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub eviction_soft_grace_period: BTreeMap<String, String>,

    /// Ceiling on pod grace periods honored during soft eviction
    #[serde(
        rename = "evictionMaxPodGracePeriod",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub eviction_max_pod_grace_period: Option<i32>,

    /// Disk usage percentage that triggers image garbage collection
    #[serde(
        rename = "imageGCHighThresholdPercent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_gc_high_threshold_percent: Option<i32>,

    /// Disk usage percentage image garbage collection reclaims down to
    #[serde(
        rename = "imageGCLowThresholdPercent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_gc_low_threshold_percent: Option<i32>,

    /// Whether CPU CFS quota enforcement is enabled
    #[serde(rename = "cpuCFSQuota", default, skip_serializing_if = "Option::is_none")]
    pub cpu_cfs_quota: Option<bool>,
}
