use shared::models::{DeliverySlot, Entitlement, SlotAvailability};

use super::SlotError;

/// A customer's working slot selection during checkout.
///
/// The selection is bounded by the entitlement captured at construction.
/// Picking an already-selected slot deselects it. When a non-member
/// (single-slot entitlement) picks a second slot the previous pick is
/// replaced; a member at their two-slot limit gets a rejection instead,
/// so they must deselect explicitly before switching.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    entitlement: Entitlement,
    selected: Vec<i64>,
}

impl SlotSelection {
    pub fn new(entitlement: Entitlement) -> Self {
        Self {
            entitlement,
            selected: Vec::new(),
        }
    }

    pub fn selected_ids(&self) -> &[i64] {
        &self.selected
    }

    pub fn is_complete(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Toggle a slot in or out of the selection.
    pub fn toggle(&mut self, slot: &DeliverySlot) -> Result<(), SlotError> {
        if let Some(pos) = self.selected.iter().position(|&id| id == slot.id) {
            self.selected.remove(pos);
            return Ok(());
        }

        if !self.entitlement.can_see(slot.slot_type) {
            return Err(SlotError::NotVisible(slot.id));
        }
        if slot.is_full() {
            return Err(SlotError::CapacityExhausted(slot.id));
        }

        if self.selected.len() >= self.entitlement.max_slots {
            if self.entitlement.max_slots == 1 {
                self.selected.clear();
            } else {
                return Err(SlotError::SelectionFull(self.entitlement.max_slots));
            }
        }

        self.selected.push(slot.id);
        Ok(())
    }

    /// Remove a slot if present. Removing an absent slot is a no-op.
    pub fn remove(&mut self, slot_id: i64) {
        self.selected.retain(|&id| id != slot_id);
    }
}

/// Project the slots a customer can see, with live remaining capacity.
/// Slots outside the entitlement's visible types are omitted entirely.
pub fn list_available(slots: &[DeliverySlot], entitlement: &Entitlement) -> Vec<SlotAvailability> {
    slots
        .iter()
        .filter(|s| s.is_active && entitlement.can_see(s.slot_type))
        .map(|s| SlotAvailability {
            remaining: s.remaining(),
            selectable: !s.is_full(),
            slot: s.clone(),
        })
        .collect()
}
