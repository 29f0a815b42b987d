//! Meal Preparation Task Repository

use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};
use shared::models::{MealPreparationTask, PrepTaskStatus};

const TASK_SELECT: &str = "SELECT id, order_id, meal_id, meal_name, quantity, status, created_at, updated_at FROM meal_prep_task";

pub async fn find_all(
    pool: &SqlitePool,
    status: Option<PrepTaskStatus>,
) -> RepoResult<Vec<MealPreparationTask>> {
    let rows = match status {
        Some(status) => {
            let sql = format!("{TASK_SELECT} WHERE status = ? ORDER BY created_at ASC");
            sqlx::query_as::<_, MealPreparationTask>(&sql)
                .bind(status.as_str())
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!("{TASK_SELECT} ORDER BY created_at ASC");
            sqlx::query_as::<_, MealPreparationTask>(&sql)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MealPreparationTask>> {
    let sql = format!("{TASK_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, MealPreparationTask>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Advance a task along the legal progression. The UPDATE is guarded on
/// the expected current status so concurrent kitchen clients cannot both
/// apply conflicting moves.
pub async fn advance_status(
    pool: &SqlitePool,
    id: i64,
    next: PrepTaskStatus,
) -> RepoResult<MealPreparationTask> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Preparation task {id}")))?;

    if !current.status.can_advance_to(next) {
        return Err(RepoError::Validation(format!(
            "Task {} cannot move from {} to {}",
            id,
            current.status.as_str(),
            next.as_str()
        )));
    }

    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE meal_prep_task SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(next.as_str())
    .bind(now)
    .bind(id)
    .bind(current.status.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::Duplicate(format!(
            "Task {id} was updated concurrently, refresh and retry"
        )));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Preparation task {id}")))
}

/// Cancel every non-terminal task of a cancelled order. Runs on an open
/// transaction alongside the order status flip.
pub async fn cancel_for_order(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE meal_prep_task SET status = 'CANCELLED', updated_at = ?1 WHERE order_id = ?2 AND status NOT IN ('DELIVERED', 'CANCELLED')",
    )
    .bind(now)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
