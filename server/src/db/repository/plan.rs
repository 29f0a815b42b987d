//! Plan Repository
//!
//! Read-only access to the subscription plan catalog. Plans referenced by
//! placed orders are snapshotted into the order row, never read live.

use sqlx::SqlitePool;

use super::RepoResult;
use shared::models::Plan;

const PLAN_SELECT: &str = "SELECT id, name, meals_per_week, price_per_week, delivery_fee, is_free_shipping, points_value, is_active, created_at, updated_at FROM plan";

pub async fn find_all_active(pool: &SqlitePool) -> RepoResult<Vec<Plan>> {
    let sql = format!("{PLAN_SELECT} WHERE is_active = 1 ORDER BY price_per_week ASC");
    let rows = sqlx::query_as::<_, Plan>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Plan>> {
    let sql = format!("{PLAN_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Plan>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
