//! Node class reference resolution
//!
//! v1beta1 allows a `nodeClassRef` with blank kind/apiVersion, meaning "the
//! cluster default node class". v1 requires both. Converting forward fills
//! the blanks from the registry; converting back must restore what the user
//! actually wrote, so the exact legacy reference is stashed in an annotation
//! on every forward conversion - even when nothing was blank, since a future
//! registry change must not rewrite a previously-explicit reference.

use crate::crd::v1::NODE_CLASS_REFERENCE_ANNOTATION;
use crate::crd::{v1, v1beta1};

use super::{annotations, ConvertError};

/// Environment variable listing the node class kinds the cluster supports,
/// comma-separated as `Kind.group` names, most-preferred first.
pub const NODE_CLASSES_ENV: &str = "VARANTO_NODE_CLASSES";

/// Registry entry used when the variable is unset.
const DEFAULT_NODE_CLASSES: &str = "NodeImage.infra.varanto.io";

/// A node class kind and the API group serving it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeClassKind {
    pub kind: String,
    pub group: String,
}

/// Process-wide table of supported node class kinds
///
/// Populated once at startup and read-only afterwards; shared behind `Arc`
/// across concurrent conversions. Entry 0 is the cluster default.
#[derive(Clone, Debug, Default)]
pub struct NodeClassRegistry {
    kinds: Vec<NodeClassKind>,
}

impl NodeClassRegistry {
    pub fn new(kinds: Vec<NodeClassKind>) -> Self {
        Self { kinds }
    }

    /// Build the registry from `VARANTO_NODE_CLASSES`.
    ///
    /// Entries that do not parse as `Kind.group` are skipped with a warning;
    /// an explicitly empty variable yields an empty registry, in which case
    /// conversions that need a default fail with [`ConvertError::MissingDefault`].
    pub fn from_env() -> Self {
        let raw = std::env::var(NODE_CLASSES_ENV)
            .unwrap_or_else(|_| DEFAULT_NODE_CLASSES.to_string());
        Self::parse(&raw)
    }

    fn parse(raw: &str) -> Self {
        let kinds = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match entry.split_once('.') {
                Some((kind, group)) if !kind.is_empty() && !group.is_empty() => {
                    Some(NodeClassKind {
                        kind: kind.to_string(),
                        group: group.to_string(),
                    })
                }
                _ => {
                    tracing::warn!(entry, "Skipping malformed node class entry");
                    None
                }
            })
            .collect();
        Self { kinds }
    }

    /// The cluster default node class: entry 0.
    pub fn default_kind(&self) -> Result<&NodeClassKind, ConvertError> {
        self.kinds.first().ok_or(ConvertError::MissingDefault)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Resolve the v1beta1 reference for a v1 object being converted.
///
/// A stashed exact reference wins outright: it is the reference the user
/// originally wrote, possibly with blanks the forward conversion defaulted
/// away. Without a stash, name/kind copy over and apiVersion stays blank -
/// there is nothing to recover it from.
pub fn to_v1beta1(
    current: &v1::NodeClassReference,
    stash: Option<&str>,
) -> Result<v1beta1::NodeClassReference, ConvertError> {
    if let Some(raw) = stash {
        return annotations::decode(NODE_CLASS_REFERENCE_ANNOTATION, raw);
    }
    Ok(v1beta1::NodeClassReference {
        kind: current.kind.clone(),
        name: current.name.clone(),
        api_version: String::new(),
    })
}

/// Resolve the v1 reference for a v1beta1 object being converted, returning
/// it together with the encoded exact reference for the side channel.
pub fn from_v1beta1(
    legacy: &v1beta1::NodeClassReference,
    registry: &NodeClassRegistry,
) -> Result<(v1::NodeClassReference, String), ConvertError> {
    // Stash before defaulting; this is the only opportunity to remember the
    // pre-default spelling.
    let blob = annotations::encode(NODE_CLASS_REFERENCE_ANNOTATION, legacy)?;

    let kind = if legacy.kind.is_empty() {
        registry.default_kind()?.kind.clone()
    } else {
        legacy.kind.clone()
    };
    let group = if legacy.api_version.is_empty() {
        registry.default_kind()?.group.clone()
    } else {
        legacy
            .api_version
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string()
    };

    Ok((
        v1::NodeClassReference {
            kind,
            name: legacy.name.clone(),
            group,
        },
        blob,
    ))
}

#[cfg(test)]
#[path = "class_ref_test.rs"]
mod tests;
