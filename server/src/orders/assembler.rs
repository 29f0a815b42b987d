use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db::repository::{
    loyalty as loyalty_repo, membership, order as order_repo, prep_task, slot, RepoError,
};
use crate::entitlement;
use crate::pricing;
use crate::slots::SlotSelection;
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderStatus};

use super::OrderDraft;

/// Submit a validated draft as an order.
///
/// Side effects run in a fixed sequence: commit slot bookings, redeem
/// the reward, compute totals, persist the order, award points. Any
/// failure unwinds the side effects already applied before the error is
/// returned, so a rejected submission leaves no booked capacity or spent
/// points behind.
pub async fn submit(pool: &SqlitePool, draft: OrderDraft) -> AppResult<Order> {
    let member_record = membership::find_by_customer(pool, draft.customer_id).await?;
    let member_plan = match &member_record {
        Some(m) => membership::find_plan_by_id(pool, m.membership_plan_id).await?,
        None => None,
    };
    let ent = entitlement::resolve(member_record.as_ref(), member_plan.as_ref());

    // Returning customers are recognized by a membership or an earlier
    // order; anyone else checks out as a guest and must carry
    // credentials so an account can be created.
    let has_account = member_record.is_some()
        || order_repo::exists_for_customer(pool, draft.customer_id).await?;
    let draft = draft.with_existing_account(has_account);

    draft.validate(&ent)?;

    let slots = slot::find_by_ids(pool, &draft.slot_ids).await?;
    if slots.len() != draft.slot_ids.len() {
        return Err(AppError::NotFound("One or more delivery slots".into()));
    }
    let mut selection = SlotSelection::new(ent.clone());
    for slot in &slots {
        selection.toggle(slot)?;
    }

    slot::commit_bookings(pool, &draft.slot_ids).await?;

    let order_id = shared::util::snowflake_id();

    let reward_value = if draft.reward_requested {
        match crate::loyalty::redeem(pool, order_id, draft.customer_id).await {
            Ok(value) => Some(value),
            Err(e) => {
                release_quietly(pool, &draft.slot_ids).await;
                return Err(e);
            }
        }
    } else {
        None
    };

    let totals = pricing::compute(&draft.plan, &draft.drinks, &ent, reward_value);

    if let Some(client_total) = draft.client_total {
        if !pricing::money_eq(client_total, totals.total) {
            warn!(
                order_id,
                client_total,
                server_total = totals.total,
                "client-computed total disagrees with server pricing"
            );
        }
    }

    let order = Order {
        id: order_id,
        customer_id: draft.customer_id,
        plan: draft.plan.clone(),
        meals: draft.meals.clone(),
        drinks: draft.drinks.clone(),
        slot_ids: draft.slot_ids.clone(),
        payment_method: draft.payment_method,
        subtotal: totals.subtotal,
        discount: totals.discount,
        delivery_fee: totals.delivery_fee,
        reward_applied: reward_value.is_some(),
        reward_value: totals.reward_value,
        total: totals.total,
        status: OrderStatus::Placed,
        created_at: shared::util::now_millis(),
    };

    if let Err(e) = order_repo::insert(pool, &order).await {
        unwind_redemption_and_slots(pool, order_id, &draft.slot_ids, draft.reward_requested).await;
        return Err(e.into());
    }

    if let Err(e) =
        crate::loyalty::award_for_order(pool, order_id, draft.customer_id, draft.plan.points_value)
            .await
    {
        if let Err(del) = order_repo::delete(pool, order_id).await {
            error!(order_id, error = %del, "failed to remove order during unwind");
        }
        unwind_redemption_and_slots(pool, order_id, &draft.slot_ids, draft.reward_requested).await;
        return Err(e);
    }

    info!(
        order_id,
        customer_id = order.customer_id,
        total = order.total,
        slots = ?order.slot_ids,
        "order placed"
    );
    Ok(order)
}

/// Cancel a placed order, releasing its bookings and reverting its
/// loyalty effects. The status flip is guarded, so a double cancel
/// releases capacity only once. Flip, release and reverts run in one
/// transaction: a failure mid-unwind rolls the flip back too, leaving
/// the order PLACED and the cancel retryable.
pub async fn cancel(pool: &SqlitePool, order_id: i64) -> AppResult<Order> {
    let order = order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    if !order_repo::try_cancel(&mut tx, order_id).await? {
        return Err(AppError::Conflict(format!(
            "Order {order_id} is already cancelled"
        )));
    }

    slot::release_bookings_in(&mut tx, &order.slot_ids).await?;
    prep_task::cancel_for_order(&mut tx, order_id).await?;
    loyalty_repo::revert_award_in(&mut tx, order_id).await?;
    loyalty_repo::revert_redemption_in(&mut tx, order_id).await?;

    tx.commit().await.map_err(RepoError::from)?;

    info!(order_id, customer_id = order.customer_id, "order cancelled");

    order_repo::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {order_id}")))
}

async fn release_quietly(pool: &SqlitePool, slot_ids: &[i64]) {
    if let Err(e) = slot::release_bookings(pool, slot_ids).await {
        error!(error = %e, "failed to release slot bookings during unwind");
    }
}

async fn unwind_redemption_and_slots(
    pool: &SqlitePool,
    order_id: i64,
    slot_ids: &[i64],
    reward_requested: bool,
) {
    if reward_requested {
        if let Err(e) = loyalty_repo::revert_redemption(pool, order_id).await {
            error!(order_id, error = %e, "failed to revert redemption during unwind");
        }
    }
    release_quietly(pool, slot_ids).await;
}
