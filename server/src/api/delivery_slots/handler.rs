//! Delivery Slot Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{membership, slot};
use crate::entitlement;
use crate::slots;
use crate::utils::AppResult;
use shared::models::SlotAvailability;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    /// Resolve availability against this customer's membership;
    /// omitted means non-member tier
    pub customer_id: Option<i64>,
}

/// GET /api/delivery-slots?customerId=n
///
/// Full slots stay in the response flagged unselectable, so the
/// storefront can show why a window is blocked.
pub async fn list_available(
    State(state): State<ServerState>,
    Query(query): Query<SlotQuery>,
) -> AppResult<Json<Vec<SlotAvailability>>> {
    let member_record = match query.customer_id {
        Some(customer_id) => membership::find_by_customer(&state.pool, customer_id).await?,
        None => None,
    };
    let member_plan = match &member_record {
        Some(m) => membership::find_plan_by_id(&state.pool, m.membership_plan_id).await?,
        None => None,
    };
    let ent = entitlement::resolve(member_record.as_ref(), member_plan.as_ref());

    let all_slots = slot::find_active(&state.pool).await?;
    Ok(Json(slots::list_available(&all_slots, &ent)))
}
