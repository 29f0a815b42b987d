//! Membership Repository
//!
//! Exclusively owns `membership.status` mutation. Transitions are
//! conditional UPDATEs guarded on the current status: when two concurrent
//! transitions race, exactly one wins and the loser observes zero rows
//! affected and reports the post-transition state.

use sqlx::SqlitePool;

use super::{RepoError, RepoResult};
use shared::models::{Membership, MembershipCreate, MembershipPlan, MembershipStatus};

const MEMBERSHIP_SELECT: &str = "SELECT id, customer_id, membership_plan_id, status, billing_day_of_month, started_at, next_billing_date, cancelled_at, created_at, updated_at FROM membership";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Membership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Membership>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Latest membership for a customer, cancelled ones included. Entitlement
/// resolution inspects the status itself.
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<Option<Membership>> {
    let sql = format!("{MEMBERSHIP_SELECT} WHERE customer_id = ? ORDER BY created_at DESC LIMIT 1");
    let row = sqlx::query_as::<_, Membership>(&sql)
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: MembershipCreate) -> RepoResult<Membership> {
    if !(1..=28).contains(&data.billing_day_of_month) {
        return Err(RepoError::Validation(format!(
            "billing_day_of_month must be between 1 and 28, got {}",
            data.billing_day_of_month
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO membership (id, customer_id, membership_plan_id, status, billing_day_of_month, created_at, updated_at) VALUES (?1, ?2, ?3, 'PENDING', ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(data.customer_id)
    .bind(data.membership_plan_id)
    .bind(data.billing_day_of_month)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create membership".into()))
}

pub async fn find_plan_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MembershipPlan>> {
    let row = sqlx::query_as::<_, MembershipPlan>(
        "SELECT id, name, monthly_fee, discount_percentage, delivery_slots_per_week, includes_free_desserts, free_dessert_quantity, perks, is_active, created_at, updated_at FROM membership_plan WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Activate a pending membership, stamping start and billing dates.
/// Returns false if the membership was not in PENDING.
pub async fn try_activate(
    pool: &SqlitePool,
    id: i64,
    started_at: i64,
    next_billing_date: &str,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE membership SET status = 'ACTIVE', started_at = ?1, next_billing_date = ?2, updated_at = ?3 WHERE id = ?4 AND status = 'PENDING'",
    )
    .bind(started_at)
    .bind(next_billing_date)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Move between ACTIVE and FROZEN. Returns false if the membership was
/// not in the expected source status.
pub async fn try_set_status(
    pool: &SqlitePool,
    id: i64,
    from: MembershipStatus,
    to: MembershipStatus,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE membership SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
    )
    .bind(to.as_str())
    .bind(now)
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Cancel from ACTIVE or FROZEN (terminal). Returns false if the
/// membership was already cancelled or still pending.
pub async fn try_cancel(pool: &SqlitePool, id: i64, cancelled_at: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "UPDATE membership SET status = 'CANCELLED', cancelled_at = ?1, updated_at = ?2 WHERE id = ?3 AND status IN ('ACTIVE', 'FROZEN')",
    )
    .bind(cancelled_at)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
