//! Meal Preparation Task Handlers
//!
//! Downstream kitchen view of placed orders.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::prep_task;
use crate::utils::AppResult;
use shared::models::{MealPreparationTask, PrepTaskStatus};

#[derive(Deserialize)]
pub struct TaskQuery {
    pub status: Option<PrepTaskStatus>,
}

#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: PrepTaskStatus,
}

/// GET /api/preparation-tasks?status=PENDING
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TaskQuery>,
) -> AppResult<Json<Vec<MealPreparationTask>>> {
    let tasks = prep_task::find_all(&state.pool, query.status).await?;
    Ok(Json(tasks))
}

/// PUT /api/preparation-tasks/:id/status - advance along the legal
/// progression
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<MealPreparationTask>> {
    let task = prep_task::advance_status(&state.pool, id, payload.status).await?;
    Ok(Json(task))
}
