//! Order Models

use serde::{Deserialize, Serialize};

use super::plan::PlanSnapshot;

/// Payment method selected at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PaymentMethod {
    Cod,
    Online,
}

/// Order status. Orders are immutable after creation except for
/// cancellation (which releases their slot bookings)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    Placed,
    Cancelled,
}

/// Selected meal with quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealLine {
    pub meal_id: i64,
    pub name: String,
    pub quantity: i32,
}

/// Selected drink add-on with quantity and unit price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrinkLine {
    pub drink_id: i64,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// Delivery contact details collected at checkout.
///
/// Email and password are only required when the customer has no existing
/// account (guest checkout creates one).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub country: String,
    pub address: String,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Plan fields frozen at submission time
    #[cfg_attr(feature = "db", sqlx(json))]
    pub plan: PlanSnapshot,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub meals: Vec<MealLine>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub drinks: Vec<DrinkLine>,
    /// Committed delivery slot ids, in selection order
    #[cfg_attr(feature = "db", sqlx(json))]
    pub slot_ids: Vec<i64>,
    pub payment_method: PaymentMethod,
    pub subtotal: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    pub reward_applied: bool,
    /// Monetary value deducted when a reward was applied
    pub reward_value: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: i64,
}
