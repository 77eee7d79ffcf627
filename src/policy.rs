use crate::model::Tier;

/// Maps requester tiers to resource tiers and back. Pure, no side effects.
///
/// Every method is total over [`Tier`].
pub trait EligibilityPolicy: Send + Sync {
    /// Resource tiers a requester may occupy, in search order.
    fn eligible_resource_tiers(&self, requester: Tier) -> &[Tier];

    /// Requester tiers that may occupy a resource tier, highest claim first.
    fn eligible_requester_tiers(&self, resource: Tier) -> &[Tier];

    /// The resource tier a requester tier has first claim on.
    fn priority_resource_tier(&self, requester: Tier) -> Tier;

    /// The requester tier whose priority queue a freed resource drains first.
    fn priority_requester_tier(&self, resource: Tier) -> Tier;
}

/// Own tier first, then each lower tier in descending order.
/// A resource tier is open to requesters at or above it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TierPriorityPolicy;

impl EligibilityPolicy for TierPriorityPolicy {
    fn eligible_resource_tiers(&self, requester: Tier) -> &[Tier] {
        match requester {
            Tier::Standard => &[Tier::Standard],
            Tier::Gold => &[Tier::Gold, Tier::Standard],
            Tier::Platinum => &[Tier::Platinum, Tier::Gold, Tier::Standard],
        }
    }

    fn eligible_requester_tiers(&self, resource: Tier) -> &[Tier] {
        match resource {
            Tier::Standard => &[Tier::Platinum, Tier::Gold, Tier::Standard],
            Tier::Gold => &[Tier::Platinum, Tier::Gold],
            Tier::Platinum => &[Tier::Platinum],
        }
    }

    fn priority_resource_tier(&self, requester: Tier) -> Tier {
        requester
    }

    fn priority_requester_tier(&self, resource: Tier) -> Tier {
        resource
    }
}
