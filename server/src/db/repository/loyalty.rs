//! Loyalty Repository
//!
//! Exclusively owns `total_points_earned` / `points_redeemed` mutation.
//! Awards are keyed to the order id (INSERT into a primary-keyed award
//! table), which makes a retried award a no-op. Redemptions are guarded
//! by a balance condition in the UPDATE itself.

use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};
use shared::models::LoyaltyAccount;

const ACCOUNT_SELECT: &str = "SELECT customer_id, total_points_earned, points_redeemed, reward_threshold, reward_value, created_at, updated_at FROM loyalty_account";

pub async fn find_by_customer(
    pool: &SqlitePool,
    customer_id: i64,
) -> RepoResult<Option<LoyaltyAccount>> {
    let sql = format!("{ACCOUNT_SELECT} WHERE customer_id = ?");
    let row = sqlx::query_as::<_, LoyaltyAccount>(&sql)
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Fetch the customer's account, creating an empty one on first touch
pub async fn ensure_account(pool: &SqlitePool, customer_id: i64) -> RepoResult<LoyaltyAccount> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO loyalty_account (customer_id, created_at, updated_at) VALUES (?1, ?2, ?2)",
    )
    .bind(customer_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_customer(pool, customer_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create loyalty account".into()))
}

/// Award points for a completed order, exactly once per order id.
///
/// Returns true when the award was applied, false when this order was
/// already awarded (e.g. a retry after a network timeout).
pub async fn record_award(
    pool: &SqlitePool,
    order_id: i64,
    customer_id: i64,
    points: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT OR IGNORE INTO loyalty_award (order_id, customer_id, points, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(order_id)
    .bind(customer_id)
    .bind(points)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if inserted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    sqlx::query(
        "UPDATE loyalty_account SET total_points_earned = total_points_earned + ?1, updated_at = ?2 WHERE customer_id = ?3",
    )
    .bind(points)
    .bind(now)
    .bind(customer_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(true)
}

/// Remove a previously recorded award (order cancellation and
/// compensation paths). Runs on an open transaction.
pub async fn revert_award_in(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();

    let award = sqlx::query_as::<_, (i64, i64)>(
        "SELECT customer_id, points FROM loyalty_award WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some((customer_id, points)) = award {
        sqlx::query("DELETE FROM loyalty_award WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            "UPDATE loyalty_account SET total_points_earned = total_points_earned - ?1, updated_at = ?2 WHERE customer_id = ?3",
        )
        .bind(points)
        .bind(now)
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Redeem one reward against the order: decrement the available balance
/// by the threshold and record the redemption.
///
/// Returns the fixed reward value, or None when the balance is below the
/// threshold (the condition lives in the UPDATE, so a concurrent
/// redemption cannot double-spend the same points).
pub async fn record_redemption(
    pool: &SqlitePool,
    order_id: i64,
    customer_id: i64,
) -> RepoResult<Option<f64>> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let account = sqlx::query_as::<_, LoyaltyAccount>(&format!(
        "{ACCOUNT_SELECT} WHERE customer_id = ?"
    ))
    .bind(customer_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| RepoError::NotFound(format!("Loyalty account for customer {customer_id}")))?;

    let updated = sqlx::query(
        "UPDATE loyalty_account SET points_redeemed = points_redeemed + reward_threshold, updated_at = ?1 WHERE customer_id = ?2 AND total_points_earned - points_redeemed >= reward_threshold",
    )
    .bind(now)
    .bind(customer_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    sqlx::query(
        "INSERT INTO loyalty_redemption (order_id, customer_id, points_spent, reward_value, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(order_id)
    .bind(customer_id)
    .bind(account.reward_threshold)
    .bind(account.reward_value)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(account.reward_value))
}

/// Refund a redemption (order compensation path): restore the points and
/// drop the redemption record.
pub async fn revert_redemption(pool: &SqlitePool, order_id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    revert_redemption_in(&mut tx, order_id).await?;
    tx.commit().await?;
    Ok(())
}

/// Same as [`revert_redemption`] but on an open transaction.
pub async fn revert_redemption_in(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();

    let redemption = sqlx::query_as::<_, (i64, i64)>(
        "SELECT customer_id, points_spent FROM loyalty_redemption WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some((customer_id, points_spent)) = redemption {
        sqlx::query("DELETE FROM loyalty_redemption WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            "UPDATE loyalty_account SET points_redeemed = MAX(points_redeemed - ?1, 0), updated_at = ?2 WHERE customer_id = ?3",
        )
        .bind(points_spent)
        .bind(now)
        .bind(customer_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
