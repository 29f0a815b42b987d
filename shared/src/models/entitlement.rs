//! Entitlement Model

use serde::{Deserialize, Serialize};

use super::delivery_slot::SlotType;

/// Booking and discount rights derived from a customer's current
/// membership status. Pure data; derivation lives in the server's
/// entitlement resolver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entitlement {
    /// 1 for non-members, 2 for active members
    pub max_slots: usize,
    pub visible_slot_types: Vec<SlotType>,
    /// 0-100, percentage off the full order subtotal
    pub discount_percent: f64,
    pub free_dessert_quota: i32,
}

impl Entitlement {
    pub fn can_see(&self, slot_type: SlotType) -> bool {
        self.visible_slot_types.contains(&slot_type)
    }
}
