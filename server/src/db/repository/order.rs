//! Order Repository
//!
//! Orders are immutable after creation except for cancellation. The
//! cancel flip is status-guarded so slot bookings for one order can only
//! ever be released once.

use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};
use shared::models::Order;

const ORDER_SELECT: &str = "SELECT id, customer_id, plan, meals, drinks, slot_ids, payment_method, subtotal, discount, delivery_fee, reward_applied, reward_value, total, status, created_at FROM orders";

fn to_json<T: serde::Serialize>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|e| RepoError::Database(format!("JSON encode: {e}")))
}

/// Whether any order exists for this customer. Used to tell returning
/// customers from guest checkouts.
pub async fn exists_for_customer(pool: &SqlitePool, customer_id: i64) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
        .bind(customer_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Persist the order and derive one preparation task per meal line, in a
/// single transaction.
pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO orders (id, customer_id, plan, meals, drinks, slot_ids, payment_method, subtotal, discount, delivery_fee, reward_applied, reward_value, total, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, 'PLACED', ?14)",
    )
    .bind(order.id)
    .bind(order.customer_id)
    .bind(to_json(&order.plan)?)
    .bind(to_json(&order.meals)?)
    .bind(to_json(&order.drinks)?)
    .bind(to_json(&order.slot_ids)?)
    .bind(match order.payment_method {
        shared::models::PaymentMethod::Cod => "COD",
        shared::models::PaymentMethod::Online => "ONLINE",
    })
    .bind(order.subtotal)
    .bind(order.discount)
    .bind(order.delivery_fee)
    .bind(order.reward_applied)
    .bind(order.reward_value)
    .bind(order.total)
    .bind(order.created_at)
    .execute(&mut *tx)
    .await?;

    for meal in &order.meals {
        sqlx::query(
            "INSERT INTO meal_prep_task (id, order_id, meal_id, meal_name, quantity, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'PENDING', ?6, ?6)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order.id)
        .bind(meal.meal_id)
        .bind(&meal.name)
        .bind(meal.quantity)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Flip a placed order to CANCELLED. Returns false when the order was
/// already cancelled (or never existed); the caller must not release
/// bookings in that case. Runs on an open transaction so the flip and
/// the effects it implies commit or roll back together.
pub async fn try_cancel(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("UPDATE orders SET status = 'CANCELLED' WHERE id = ? AND status = 'PLACED'")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Hard-delete an order and its derived tasks (compensation path only;
/// the order never became visible to any consumer).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM meal_prep_task WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
