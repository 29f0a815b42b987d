//! Delivery Slot Model

use serde::{Deserialize, Serialize};

/// Slot visibility tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum SlotType {
    /// Bookable by everyone without an active membership
    Normal,
    /// Reserved for active members
    Membership,
    /// Bookable by both tiers
    Both,
}

/// Weekly delivery time window with a hard capacity ceiling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeliverySlot {
    pub id: i64,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: i32,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub slot_type: SlotType,
    /// Hard ceiling; current_bookings never exceeds it
    pub capacity: i32,
    pub current_bookings: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DeliverySlot {
    pub fn remaining(&self) -> i32 {
        (self.capacity - self.current_bookings).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.current_bookings >= self.capacity
    }
}

/// Storefront view of a slot: full slots stay visible so the customer sees
/// why a choice is blocked, but they are not selectable.
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    #[serde(flatten)]
    pub slot: DeliverySlot,
    pub remaining: i32,
    pub selectable: bool,
}
