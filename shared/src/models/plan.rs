//! Subscription Plan Model

use serde::{Deserialize, Serialize};

/// Subscription plan entity (weekly meal plan)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Plan {
    pub id: i64,
    pub name: String,
    /// Number of meals delivered per week
    pub meals_per_week: i32,
    /// Weekly price, currency-denominated
    pub price_per_week: f64,
    /// Delivery fee per order (zero when is_free_shipping)
    pub delivery_fee: f64,
    pub is_free_shipping: bool,
    /// Loyalty points awarded per completed order
    pub points_value: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Pricing-relevant plan fields frozen into an order at submission time.
///
/// Historical orders must keep the price in effect at order time, never a
/// live plan reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSnapshot {
    pub plan_id: i64,
    pub name: String,
    pub price_per_week: f64,
    pub delivery_fee: f64,
    pub is_free_shipping: bool,
    pub points_value: i64,
}

impl From<&Plan> for PlanSnapshot {
    fn from(plan: &Plan) -> Self {
        Self {
            plan_id: plan.id,
            name: plan.name.clone(),
            price_per_week: plan.price_per_week,
            delivery_fee: plan.delivery_fee,
            is_free_shipping: plan.is_free_shipping,
            points_value: plan.points_value,
        }
    }
}
