//! Membership Models

use serde::{Deserialize, Serialize};

/// Membership lifecycle status.
///
/// `pending -> active <-> frozen`, and `active|frozen -> cancelled`
/// (terminal). Status transitions are the only way a membership's
/// entitlement set changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum MembershipStatus {
    Pending,
    Active,
    Frozen,
    Cancelled,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Frozen => "FROZEN",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Membership entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Membership {
    pub id: i64,
    pub customer_id: i64,
    pub membership_plan_id: i64,
    pub status: MembershipStatus,
    /// Day of month the monthly fee is billed (1-28)
    pub billing_day_of_month: i32,
    /// Set on activation (Unix millis)
    pub started_at: Option<i64>,
    /// "YYYY-MM-DD", computed from billing_day_of_month on activation
    pub next_billing_date: Option<String>,
    /// Set on cancellation (Unix millis)
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create membership payload; every subscription starts in `pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipCreate {
    pub customer_id: i64,
    pub membership_plan_id: i64,
    pub billing_day_of_month: i32,
}

/// Membership plan (distinct from the subscription meal Plan)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MembershipPlan {
    pub id: i64,
    pub name: String,
    pub monthly_fee: f64,
    /// 0-100, applied to the full order subtotal
    pub discount_percentage: f64,
    /// Entitlement count, not a DeliverySlot reference
    pub delivery_slots_per_week: i32,
    pub includes_free_desserts: bool,
    pub free_dessert_quantity: i32,
    /// Ordered marketing copy, stored as JSON
    #[cfg_attr(feature = "db", sqlx(json))]
    pub perks: Vec<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}
