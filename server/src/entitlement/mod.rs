//! Entitlement Resolver
//!
//! Pure derivation of booking/discount rights from the current membership
//! status. Never cached: handlers re-resolve on every request so a
//! freeze/unfreeze changes what a customer can book immediately.

use shared::models::{Entitlement, Membership, MembershipPlan, MembershipStatus, SlotType};

/// Derive the entitlement for a customer.
///
/// Only an ACTIVE membership unlocks the member tier: two weekly slots
/// (or the plan's entitlement count, capped at two), membership-type slot
/// visibility, the plan discount and the free-dessert quota. Every other
/// status, including no membership at all, gets the non-member baseline.
pub fn resolve(
    membership: Option<&Membership>,
    plan: Option<&MembershipPlan>,
) -> Entitlement {
    let is_active = membership
        .map(|m| m.status == MembershipStatus::Active)
        .unwrap_or(false);

    if is_active {
        Entitlement {
            max_slots: plan
                .map(|p| p.delivery_slots_per_week.clamp(1, 2) as usize)
                .unwrap_or(2),
            visible_slot_types: vec![SlotType::Membership, SlotType::Both],
            discount_percent: plan.map(|p| p.discount_percentage).unwrap_or(0.0),
            free_dessert_quota: plan
                .filter(|p| p.includes_free_desserts)
                .map(|p| p.free_dessert_quantity)
                .unwrap_or(0),
        }
    } else {
        Entitlement {
            max_slots: 1,
            visible_slot_types: vec![SlotType::Normal, SlotType::Both],
            discount_percent: 0.0,
            free_dessert_quota: 0,
        }
    }
}
