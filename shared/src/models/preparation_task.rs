//! Meal Preparation Task Model
//!
//! Downstream consumer of order data: one task per order meal line, worked
//! through by the kitchen on the operations dashboard.

use serde::{Deserialize, Serialize};

/// Preparation task status.
///
/// Forward progression `pending -> preparing -> ready_for_delivery ->
/// delivered`; `cancelled` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PrepTaskStatus {
    Pending,
    Preparing,
    ReadyForDelivery,
    Delivered,
    Cancelled,
}

impl PrepTaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::ReadyForDelivery => "READY_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Whether `next` is a legal successor of `self`
    pub fn can_advance_to(&self, next: PrepTaskStatus) -> bool {
        use PrepTaskStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing)
                | (Preparing, ReadyForDelivery)
                | (ReadyForDelivery, Delivered)
                | (Pending, Cancelled)
                | (Preparing, Cancelled)
                | (ReadyForDelivery, Cancelled)
        )
    }
}

/// One kitchen task derived from an order meal line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MealPreparationTask {
    pub id: i64,
    pub order_id: i64,
    pub meal_id: i64,
    pub meal_name: String,
    pub quantity: i32,
    pub status: PrepTaskStatus,
    pub created_at: i64,
    pub updated_at: i64,
}
