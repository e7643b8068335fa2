//! Consolidation policy mapping
//!
//! v1 splits the legacy `WhenUnderutilized` policy into
//! `WhenEmptyOrUnderutilized` plus a mandatory `consolidateAfter`. The two
//! directions are not symmetric:
//!
//! - collapsing to v1beta1 discards `consolidateAfter` entirely (the legacy
//!   schema forbids it alongside `WhenUnderutilized`), and
//! - expanding to v1 manufactures an explicit `0s` because the field is
//!   required there; zero means "no extra wait", which is what the legacy
//!   policy always meant.

use crate::crd::duration::NillableDuration;
use crate::crd::{v1, v1beta1};

/// Map v1 disruption controls to v1beta1.
///
/// `expireAfter` is left at its default; it belongs to the template on the
/// v1 side and the caller relocates it.
pub fn to_v1beta1(disruption: &v1::Disruption) -> v1beta1::Disruption {
    match disruption.consolidation_policy {
        v1::ConsolidationPolicy::WhenEmptyOrUnderutilized => v1beta1::Disruption {
            consolidation_policy: v1beta1::ConsolidationPolicy::WhenUnderutilized,
            consolidate_after: None,
            expire_after: NillableDuration::default(),
        },
        v1::ConsolidationPolicy::WhenEmpty => v1beta1::Disruption {
            consolidation_policy: v1beta1::ConsolidationPolicy::WhenEmpty,
            consolidate_after: Some(disruption.consolidate_after),
            expire_after: NillableDuration::default(),
        },
    }
}

/// Map v1beta1 disruption controls to v1.
pub fn from_v1beta1(disruption: &v1beta1::Disruption) -> v1::Disruption {
    match disruption.consolidation_policy {
        v1beta1::ConsolidationPolicy::WhenUnderutilized => v1::Disruption {
            consolidation_policy: v1::ConsolidationPolicy::WhenEmptyOrUnderutilized,
            consolidate_after: NillableDuration::zero(),
        },
        v1beta1::ConsolidationPolicy::WhenEmpty => v1::Disruption {
            consolidation_policy: v1::ConsolidationPolicy::WhenEmpty,
            // an absent legacy value becomes the `Never` default
            consolidate_after: disruption.consolidate_after.unwrap_or_default(),
        },
    }
}

#[cfg(test)]
#[path = "disruption_test.rs"]
mod tests;
