//! Tests for node claim template conversion

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{from_v1beta1, to_v1beta1};
use crate::crd::conversion::{ConvertError, NodeClassKind, NodeClassRegistry};
use crate::crd::{v1, v1beta1};
use k8s_openapi::api::core::v1::{NodeSelectorRequirement, Taint};
use std::collections::BTreeMap;

fn registry() -> NodeClassRegistry {
    NodeClassRegistry::new(vec![NodeClassKind {
        kind: "NodeImage".to_string(),
        group: "infra.varanto.io".to_string(),
    }])
}

fn sample_taint() -> Taint {
    Taint {
        key: "dedicated".to_string(),
        value: Some("batch".to_string()),
        effect: "NoSchedule".to_string(),
        time_added: None,
    }
}

fn sample_v1_template() -> v1::NodeClaimTemplate {
    v1::NodeClaimTemplate {
        metadata: v1::TemplateMeta {
            labels: BTreeMap::from([("tier".to_string(), "batch".to_string())]),
            annotations: BTreeMap::new(),
        },
        spec: v1::NodeClaimTemplateSpec {
            taints: vec![sample_taint()],
            startup_taints: vec![],
            requirements: vec![v1::NodeSelectorRequirementWithMinValues {
                requirement: NodeSelectorRequirement {
                    key: "kubernetes.io/arch".to_string(),
                    operator: "In".to_string(),
                    values: Some(vec!["amd64".to_string()]),
                },
                min_values: Some(1),
            }],
            node_class_ref: v1::NodeClassReference {
                kind: "NodeImage".to_string(),
                name: "standard".to_string(),
                group: "infra.varanto.io".to_string(),
            },
            expire_after: Default::default(),
            termination_grace_period: Some("30s".to_string()),
        },
    }
}

fn sample_v1beta1_template(kubelet: Option<v1beta1::KubeletConfiguration>) -> v1beta1::NodeClaimTemplate {
    v1beta1::NodeClaimTemplate {
        metadata: v1::TemplateMeta {
            labels: BTreeMap::from([("tier".to_string(), "batch".to_string())]),
            annotations: BTreeMap::new(),
        },
        spec: v1beta1::NodeClaimSpec {
            taints: vec![sample_taint()],
            startup_taints: vec![sample_taint()],
            requirements: vec![NodeSelectorRequirement {
                key: "kubernetes.io/arch".to_string(),
                operator: "In".to_string(),
                values: Some(vec!["amd64".to_string()]),
            }],
            kubelet,
            node_class_ref: v1beta1::NodeClassReference {
                kind: "NodeImage".to_string(),
                name: "standard".to_string(),
                api_version: "infra.varanto.io/v1beta1".to_string(),
            },
        },
    }
}

#[test]
fn test_to_v1beta1_copies_verbatim_fields_and_drops_min_values() {
    let template = sample_v1_template();

    let legacy = to_v1beta1(&template, None, None).unwrap();

    assert_eq!(legacy.metadata, template.metadata);
    assert_eq!(legacy.spec.taints, template.spec.taints);
    assert_eq!(legacy.spec.startup_taints, template.spec.startup_taints);
    assert_eq!(legacy.spec.requirements.len(), 1);
    assert_eq!(legacy.spec.requirements[0].key, "kubernetes.io/arch");
    // minValues has no legacy counterpart; dropping it is the documented loss
    assert_eq!(
        serde_json::to_value(&legacy.spec.requirements[0])
            .unwrap()
            .get("minValues"),
        None
    );
}

#[test]
fn test_to_v1beta1_without_kubelet_stash_leaves_field_unset() {
    let legacy = to_v1beta1(&sample_v1_template(), None, None).unwrap();
    assert!(legacy.spec.kubelet.is_none());
}

#[test]
fn test_to_v1beta1_decodes_kubelet_stash() {
    let stash = r#"{"maxPods":110,"clusterDNS":["10.0.0.10"]}"#;

    let legacy = to_v1beta1(&sample_v1_template(), Some(stash), None).unwrap();

    let kubelet = legacy.spec.kubelet.expect("kubelet should be restored");
    assert_eq!(kubelet.max_pods, Some(110));
    assert_eq!(kubelet.cluster_dns, vec!["10.0.0.10".to_string()]);
}

#[test]
fn test_to_v1beta1_malformed_kubelet_stash_is_an_error() {
    let err = to_v1beta1(&sample_v1_template(), Some("not json"), None).unwrap_err();
    assert!(matches!(err, ConvertError::Decoding(_, _)));
}

#[test]
fn test_from_v1beta1_maps_requirements_with_unset_min_values() {
    let (current, _, _) = from_v1beta1(&sample_v1beta1_template(None), &registry()).unwrap();

    assert_eq!(current.spec.requirements.len(), 1);
    assert_eq!(
        current.spec.requirements[0].requirement.key,
        "kubernetes.io/arch"
    );
    assert_eq!(current.spec.requirements[0].min_values, None);
}

#[test]
fn test_from_v1beta1_returns_kubelet_blob_when_present() {
    let kubelet = v1beta1::KubeletConfiguration {
        max_pods: Some(58),
        ..Default::default()
    };

    let (_, kubelet_blob, _) =
        from_v1beta1(&sample_v1beta1_template(Some(kubelet.clone())), &registry()).unwrap();

    let blob = kubelet_blob.expect("kubelet blob should be produced");
    let restored: v1beta1::KubeletConfiguration = serde_json::from_str(&blob).unwrap();
    assert_eq!(restored, kubelet);
}

#[test]
fn test_from_v1beta1_signals_absent_kubelet() {
    let (_, kubelet_blob, _) = from_v1beta1(&sample_v1beta1_template(None), &registry()).unwrap();
    assert!(kubelet_blob.is_none());
}

#[test]
fn test_from_v1beta1_never_populates_grace_period() {
    let (current, _, _) = from_v1beta1(&sample_v1beta1_template(None), &registry()).unwrap();
    assert!(current.spec.termination_grace_period.is_none());
}

#[test]
fn test_from_v1beta1_leaves_expiry_for_the_caller() {
    let (current, _, _) = from_v1beta1(&sample_v1beta1_template(None), &registry()).unwrap();
    // relocation from disruption happens at the spec level, not here
    assert!(current.spec.expire_after.is_never());
}
