//! Loyalty Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::ServerState;
use crate::loyalty;
use crate::utils::AppResult;
use shared::models::LoyaltySnapshot;

/// GET /api/loyalty/:customer_id - points balance and reward eligibility
pub async fn snapshot(
    State(state): State<ServerState>,
    Path(customer_id): Path<i64>,
) -> AppResult<Json<LoyaltySnapshot>> {
    Ok(Json(loyalty::snapshot(&state.pool, customer_id).await?))
}
