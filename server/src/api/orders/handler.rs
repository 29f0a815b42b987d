//! Order Handlers
//!
//! The storefront submits a checkout payload with a client-computed
//! total; pricing is always re-run server-side and the client amount is
//! advisory only.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::repository::{order as order_repo, plan};
use crate::orders::{self, OrderDraft};
use crate::utils::{AppError, AppResult};
use shared::models::{CustomerInfo, DrinkLine, MealLine, Order, PaymentMethod, PlanSnapshot};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(rename = "user_id")]
    pub user_id: i64,
    pub payment_method: PaymentMethod,
    /// Subscription plan id
    pub plan: i64,
    #[validate(length(min = 1, message = "at least one meal is required"), nested)]
    pub meals: Vec<MealLineDto>,
    #[serde(default)]
    #[validate(nested)]
    pub drinks: Vec<DrinkLineDto>,
    #[validate(length(min = 1, message = "at least one delivery slot is required"))]
    pub slot_ids: Vec<i64>,
    #[serde(default)]
    pub reward_applied: bool,
    /// Client-computed total, advisory only
    pub total_amount: Option<f64>,
    #[validate(nested)]
    pub infos: CustomerInfoDto,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MealLineDto {
    pub meal_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DrinkLineDto {
    pub drink_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfoDto {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    #[validate(length(min = 1))]
    pub country: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(email)]
    pub email: Option<String>,
    pub password: Option<String>,
}

impl From<CustomerInfoDto> for CustomerInfo {
    fn from(dto: CustomerInfoDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            phone_number: dto.phone_number,
            country: dto.country,
            address: dto.address,
            email: dto.email,
            password: dto.password,
        }
    }
}

/// POST /api/orders - validate, price and place an order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let plan = plan::find_by_id(&state.pool, payload.plan)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {}", payload.plan)))?;
    if !plan.is_active {
        return Err(AppError::BusinessRule(format!(
            "Plan '{}' is no longer available",
            plan.name
        )));
    }

    let meals = payload
        .meals
        .into_iter()
        .map(|m| MealLine {
            meal_id: m.meal_id,
            name: m.name,
            quantity: m.quantity,
        })
        .collect();
    let drinks = payload
        .drinks
        .into_iter()
        .map(|d| DrinkLine {
            drink_id: d.drink_id,
            name: d.name,
            price: d.price,
            quantity: d.quantity,
        })
        .collect();

    let draft = OrderDraft::new(payload.user_id, PlanSnapshot::from(&plan), payload.infos.into())
        .with_meals(meals)
        .with_drinks(drinks)
        .with_slots(payload.slot_ids)
        .with_payment(payload.payment_method)
        .with_reward(payload.reward_applied)
        .with_client_total(payload.total_amount);

    let order = orders::submit(&state.pool, draft).await?;
    Ok(Json(order))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = order_repo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
    Ok(Json(order))
}

/// POST /api/orders/:id/cancel - release bookings and revert loyalty
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(orders::cancel(&state.pool, id).await?))
}
