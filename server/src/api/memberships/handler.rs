//! Membership Handlers
//!
//! Lifecycle transitions are driven by administrative or customer
//! actions; entitlements change the moment a transition lands.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::ServerState;
use crate::db::repository::membership;
use crate::entitlement;
use crate::membership::{apply, Transition};
use crate::utils::{AppError, AppResult};
use shared::models::{Entitlement, Membership, MembershipCreate};

/// POST /api/memberships - create a subscription in PENDING
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MembershipCreate>,
) -> AppResult<Json<Membership>> {
    if membership::find_plan_by_id(&state.pool, payload.membership_plan_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Membership plan {}",
            payload.membership_plan_id
        )));
    }
    let created = membership::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// GET /api/memberships/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Membership>> {
    let record = membership::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Membership {id}")))?;
    Ok(Json(record))
}

/// GET /api/memberships/:id/entitlement - rights derived from the
/// current status, recomputed on every call
pub async fn get_entitlement(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Entitlement>> {
    let record = membership::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Membership {id}")))?;
    let plan = membership::find_plan_by_id(&state.pool, record.membership_plan_id).await?;
    Ok(Json(entitlement::resolve(Some(&record), plan.as_ref())))
}

/// POST /api/memberships/:id/activate
pub async fn activate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Membership>> {
    Ok(Json(apply(&state.pool, id, Transition::Activate).await?))
}

/// POST /api/memberships/:id/freeze
pub async fn freeze(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Membership>> {
    Ok(Json(apply(&state.pool, id, Transition::Freeze).await?))
}

/// POST /api/memberships/:id/unfreeze
pub async fn unfreeze(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Membership>> {
    Ok(Json(apply(&state.pool, id, Transition::Unfreeze).await?))
}

/// POST /api/memberships/:id/cancel - terminal
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Membership>> {
    Ok(Json(apply(&state.pool, id, Transition::Cancel).await?))
}
