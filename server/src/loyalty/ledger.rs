use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository::loyalty;
use crate::utils::{AppError, AppResult};
use shared::models::{LoyaltyAccount, LoyaltySnapshot};

/// Current ledger state for a customer, creating the account on first
/// touch so new customers always see a zero balance rather than a 404.
pub async fn snapshot(pool: &SqlitePool, customer_id: i64) -> AppResult<LoyaltySnapshot> {
    let account = loyalty::ensure_account(pool, customer_id).await?;
    Ok(LoyaltySnapshot::from(&account))
}

pub fn can_redeem(account: &LoyaltyAccount) -> bool {
    account.can_redeem()
}

/// Redeem one reward for the given order.
///
/// Fails when the available balance is below the threshold. The balance
/// check and decrement are a single guarded write, so two concurrent
/// redemptions of the same points cannot both succeed.
pub async fn redeem(pool: &SqlitePool, order_id: i64, customer_id: i64) -> AppResult<f64> {
    let account = loyalty::ensure_account(pool, customer_id).await?;

    match loyalty::record_redemption(pool, order_id, customer_id).await? {
        Some(reward_value) => {
            info!(customer_id, order_id, reward_value, "loyalty reward redeemed");
            Ok(reward_value)
        }
        None => Err(AppError::InsufficientPoints {
            balance: account.balance(),
            threshold: account.reward_threshold,
        }),
    }
}

/// Award the plan's points for a completed order. Retries are absorbed:
/// an order id is only ever awarded once.
pub async fn award_for_order(
    pool: &SqlitePool,
    order_id: i64,
    customer_id: i64,
    points: i64,
) -> AppResult<()> {
    loyalty::ensure_account(pool, customer_id).await?;
    let applied = loyalty::record_award(pool, order_id, customer_id, points).await?;
    if applied {
        info!(customer_id, order_id, points, "loyalty points awarded");
    }
    Ok(())
}
