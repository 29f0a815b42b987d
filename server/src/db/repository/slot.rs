//! Delivery Slot Repository
//!
//! Exclusively owns `current_bookings` mutation. Booking commits are a
//! single conditional UPDATE per slot inside one transaction; the
//! `current_bookings < capacity` guard makes the check-and-increment
//! atomic, so two concurrent commits can never both take the last unit.

use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};
use shared::models::DeliverySlot;

const SLOT_SELECT: &str = "SELECT id, day_of_week, start_time, end_time, slot_type, capacity, current_bookings, is_active, created_at, updated_at FROM delivery_slot";

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<DeliverySlot>> {
    let sql = format!("{SLOT_SELECT} WHERE is_active = 1 ORDER BY day_of_week, start_time");
    let rows = sqlx::query_as::<_, DeliverySlot>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DeliverySlot>> {
    let sql = format!("{SLOT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, DeliverySlot>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<DeliverySlot>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{SLOT_SELECT} WHERE id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, DeliverySlot>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Atomically book every slot in the selection, all-or-nothing.
///
/// Each slot gets a conditional increment; zero rows affected means the
/// slot filled up (or was deactivated) since it was displayed, so the
/// whole transaction rolls back and the offending slot is named.
pub async fn commit_bookings(pool: &SqlitePool, slot_ids: &[i64]) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    for slot_id in slot_ids {
        let result = sqlx::query(
            "UPDATE delivery_slot SET current_bookings = current_bookings + 1, updated_at = ?1 WHERE id = ?2 AND is_active = 1 AND current_bookings < capacity",
        )
        .bind(now)
        .bind(slot_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepoError::CapacityExceeded { slot_id: *slot_id });
        }
    }

    tx.commit().await?;
    Ok(())
}

/// Release bookings for the given slots; never decrements below zero.
pub async fn release_bookings(pool: &SqlitePool, slot_ids: &[i64]) -> RepoResult<()> {
    let mut tx = pool.begin().await?;
    release_bookings_in(&mut tx, slot_ids).await?;
    tx.commit().await?;
    Ok(())
}

/// Same as [`release_bookings`] but on an open transaction, so a caller
/// can tie the release to other writes that must land with it.
pub async fn release_bookings_in(
    conn: &mut SqliteConnection,
    slot_ids: &[i64],
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    for slot_id in slot_ids {
        sqlx::query(
            "UPDATE delivery_slot SET current_bookings = MAX(current_bookings - 1, 0), updated_at = ?1 WHERE id = ?2",
        )
        .bind(now)
        .bind(slot_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}
