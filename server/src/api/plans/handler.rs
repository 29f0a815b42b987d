//! Plan Catalog Handlers
//!
//! Read-only: the catalog is consumed, not owned, by the allocation core.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::plan;
use crate::utils::{AppError, AppResult};
use shared::models::Plan;

/// GET /api/plans - active subscription plans
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Plan>>> {
    let plans = plan::find_all_active(&state.pool).await?;
    Ok(Json(plans))
}

/// GET /api/plans/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Plan>> {
    let plan = plan::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Plan {id}")))?;
    Ok(Json(plan))
}
