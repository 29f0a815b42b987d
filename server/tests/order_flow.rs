//! End-to-end flows against a real SQLite database: slot booking
//! atomicity, loyalty exactly-once semantics, lifecycle transitions and
//! full order submission with compensation.

use sqlx::SqlitePool;
use tempfile::TempDir;

use pantry_server::db::repository::{loyalty, membership, order as order_repo, prep_task, slot};
use pantry_server::db::repository::RepoError;
use pantry_server::db::DbService;
use pantry_server::membership::{apply, Transition};
use pantry_server::orders::{self, OrderDraft};
use pantry_server::AppError;
use shared::models::{
    CustomerInfo, DrinkLine, MealLine, MembershipCreate, PaymentMethod, PlanSnapshot,
};

async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    (dir, db.pool)
}

async fn seed_plan(pool: &SqlitePool, id: i64, price: f64, free_shipping: bool, points: i64) {
    sqlx::query(
        "INSERT INTO plan (id, name, meals_per_week, price_per_week, delivery_fee, is_free_shipping, points_value, is_active, created_at, updated_at) VALUES (?1, 'Family Weekly', 4, ?2, 15.0, ?3, ?4, 1, 0, 0)",
    )
    .bind(id)
    .bind(price)
    .bind(free_shipping)
    .bind(points)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_slot(pool: &SqlitePool, id: i64, slot_type: &str, capacity: i32, bookings: i32) {
    sqlx::query(
        "INSERT INTO delivery_slot (id, day_of_week, start_time, end_time, slot_type, capacity, current_bookings, is_active, created_at, updated_at) VALUES (?1, 2, '10:00', '13:00', ?2, ?3, ?4, 1, 0, 0)",
    )
    .bind(id)
    .bind(slot_type)
    .bind(capacity)
    .bind(bookings)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_membership_plan(pool: &SqlitePool, id: i64, discount: f64) {
    sqlx::query(
        "INSERT INTO membership_plan (id, name, monthly_fee, discount_percentage, delivery_slots_per_week, includes_free_desserts, free_dessert_quantity, perks, is_active, created_at, updated_at) VALUES (?1, 'Gold', 49.0, ?2, 2, 1, 4, '[]', 1, 0, 0)",
    )
    .bind(id)
    .bind(discount)
    .execute(pool)
    .await
    .unwrap();
}

async fn active_membership(pool: &SqlitePool, customer_id: i64, plan_id: i64) -> i64 {
    let created = membership::create(
        pool,
        MembershipCreate {
            customer_id,
            membership_plan_id: plan_id,
            billing_day_of_month: 15,
        },
    )
    .await
    .unwrap();
    apply(pool, created.id, Transition::Activate).await.unwrap();
    created.id
}

fn contact() -> CustomerInfo {
    CustomerInfo {
        first_name: "Maya".to_string(),
        last_name: "Lindqvist".to_string(),
        phone_number: "+46701234567".to_string(),
        country: "Sweden".to_string(),
        address: "Storgatan 1, Stockholm".to_string(),
        email: Some("maya@example.com".to_string()),
        password: Some("hunter2hunter2".to_string()),
    }
}

fn snapshot(plan_id: i64, price: f64, free_shipping: bool, points: i64) -> PlanSnapshot {
    PlanSnapshot {
        plan_id,
        name: "Family Weekly".to_string(),
        price_per_week: price,
        delivery_fee: 15.0,
        is_free_shipping: free_shipping,
        points_value: points,
    }
}

async fn bookings_of(pool: &SqlitePool, slot_id: i64) -> i32 {
    sqlx::query_scalar("SELECT current_bookings FROM delivery_slot WHERE id = ?")
        .bind(slot_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_commit_then_release_restores_bookings() {
    let (_dir, pool) = test_pool().await;
    seed_slot(&pool, 1, "NORMAL", 5, 2).await;
    seed_slot(&pool, 2, "BOTH", 5, 0).await;

    slot::commit_bookings(&pool, &[1, 2]).await.unwrap();
    assert_eq!(bookings_of(&pool, 1).await, 3);
    assert_eq!(bookings_of(&pool, 2).await, 1);

    slot::release_bookings(&pool, &[1, 2]).await.unwrap();
    assert_eq!(bookings_of(&pool, 1).await, 2);
    assert_eq!(bookings_of(&pool, 2).await, 0);
}

#[tokio::test]
async fn test_release_never_goes_below_zero() {
    let (_dir, pool) = test_pool().await;
    seed_slot(&pool, 1, "NORMAL", 5, 0).await;

    slot::release_bookings(&pool, &[1]).await.unwrap();
    assert_eq!(bookings_of(&pool, 1).await, 0);
}

#[tokio::test]
async fn test_commit_is_all_or_nothing() {
    let (_dir, pool) = test_pool().await;
    seed_slot(&pool, 1, "NORMAL", 5, 0).await;
    seed_slot(&pool, 2, "NORMAL", 3, 3).await;

    let err = slot::commit_bookings(&pool, &[1, 2]).await.unwrap_err();
    match err {
        RepoError::CapacityExceeded { slot_id } => assert_eq!(slot_id, 2),
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    // The first slot must not keep a partial increment
    assert_eq!(bookings_of(&pool, 1).await, 0);
}

#[tokio::test]
async fn test_concurrent_commits_cannot_both_take_last_unit() {
    let (_dir, pool) = test_pool().await;
    seed_slot(&pool, 1, "NORMAL", 3, 2).await;

    let (a, b) = tokio::join!(
        slot::commit_bookings(&pool, &[1]),
        slot::commit_bookings(&pool, &[1]),
    );

    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one commit may win: {a:?} {b:?}");
    assert_eq!(bookings_of(&pool, 1).await, 3);
}

#[tokio::test]
async fn test_award_is_exactly_once_per_order() {
    let (_dir, pool) = test_pool().await;
    loyalty::ensure_account(&pool, 7).await.unwrap();

    assert!(loyalty::record_award(&pool, 1001, 7, 3).await.unwrap());
    assert!(!loyalty::record_award(&pool, 1001, 7, 3).await.unwrap());

    let account = loyalty::find_by_customer(&pool, 7).await.unwrap().unwrap();
    assert_eq!(account.total_points_earned, 3);
}

#[tokio::test]
async fn test_redemption_decrements_by_threshold() {
    let (_dir, pool) = test_pool().await;
    loyalty::ensure_account(&pool, 7).await.unwrap();
    loyalty::record_award(&pool, 1001, 7, 15).await.unwrap();

    let reward = loyalty::record_redemption(&pool, 2001, 7).await.unwrap();
    assert_eq!(reward, Some(25.0));

    let account = loyalty::find_by_customer(&pool, 7).await.unwrap().unwrap();
    assert_eq!(account.total_points_earned, 15);
    assert_eq!(account.points_redeemed, 12);
    assert_eq!(account.balance(), 3);
}

#[tokio::test]
async fn test_redemption_below_threshold_is_refused() {
    let (_dir, pool) = test_pool().await;
    loyalty::ensure_account(&pool, 7).await.unwrap();
    loyalty::record_award(&pool, 1001, 7, 5).await.unwrap();

    let reward = loyalty::record_redemption(&pool, 2001, 7).await.unwrap();
    assert_eq!(reward, None);

    let account = loyalty::find_by_customer(&pool, 7).await.unwrap().unwrap();
    assert_eq!(account.points_redeemed, 0);
}

#[tokio::test]
async fn test_membership_lifecycle_matrix() {
    let (_dir, pool) = test_pool().await;
    seed_membership_plan(&pool, 100, 10.0).await;

    let created = membership::create(
        &pool,
        MembershipCreate {
            customer_id: 7,
            membership_plan_id: 100,
            billing_day_of_month: 15,
        },
    )
    .await
    .unwrap();
    let id = created.id;

    // pending -> freeze is illegal
    let err = apply(&pool, id, Transition::Freeze).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let activated = apply(&pool, id, Transition::Activate).await.unwrap();
    assert!(activated.started_at.is_some());
    assert!(activated.next_billing_date.is_some());

    // double activation is illegal
    let err = apply(&pool, id, Transition::Activate).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    apply(&pool, id, Transition::Freeze).await.unwrap();
    apply(&pool, id, Transition::Unfreeze).await.unwrap();
    apply(&pool, id, Transition::Freeze).await.unwrap();

    // frozen -> cancelled is allowed and terminal
    let cancelled = apply(&pool, id, Transition::Cancel).await.unwrap();
    assert!(cancelled.cancelled_at.is_some());

    for transition in [
        Transition::Activate,
        Transition::Freeze,
        Transition::Unfreeze,
        Transition::Cancel,
    ] {
        let err = apply(&pool, id, transition).await.unwrap_err();
        match err {
            AppError::InvalidTransition { from, .. } => assert_eq!(from, "CANCELLED"),
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_member_order_submission_happy_path() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 500.0, true, 2).await;
    seed_slot(&pool, 10, "MEMBERSHIP", 5, 0).await;
    seed_slot(&pool, 11, "BOTH", 5, 0).await;
    seed_membership_plan(&pool, 100, 10.0).await;
    active_membership(&pool, 7, 100).await;

    let draft = OrderDraft::new(7, snapshot(1, 500.0, true, 2), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 2,
        }])
        .with_drinks(vec![DrinkLine {
            drink_id: 21,
            name: "Fresh Juice".to_string(),
            price: 20.0,
            quantity: 2,
        }])
        .with_slots(vec![10, 11])
        .with_payment(PaymentMethod::Online)
        .with_client_total(Some(486.0));

    let order = orders::submit(&pool, draft).await.unwrap();

    assert_eq!(order.subtotal, 540.0);
    assert_eq!(order.discount, 54.0);
    assert_eq!(order.delivery_fee, 0.0);
    assert_eq!(order.total, 486.0);
    assert!(!order.reward_applied);

    assert_eq!(bookings_of(&pool, 10).await, 1);
    assert_eq!(bookings_of(&pool, 11).await, 1);

    // One preparation task per meal line
    let tasks = prep_task::find_all(&pool, None).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].order_id, order.id);

    // Plan points awarded exactly once
    let account = loyalty::find_by_customer(&pool, 7).await.unwrap().unwrap();
    assert_eq!(account.total_points_earned, 2);

    let stored = order_repo::find_by_id(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(stored.slot_ids, vec![10, 11]);
    assert_eq!(stored.total, 486.0);
}

#[tokio::test]
async fn test_first_order_without_credentials_is_rejected() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;

    let mut info = contact();
    info.email = None;
    info.password = None;

    // No membership and no earlier order: this is a guest checkout and
    // must carry credentials so an account can be created
    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), info)
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);

    let err = orders::submit(&pool, draft).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(bookings_of(&pool, 10).await, 0);
}

#[tokio::test]
async fn test_returning_customer_needs_no_credentials() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;

    // First order with credentials establishes the account
    let first = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);
    orders::submit(&pool, first).await.unwrap();

    let mut info = contact();
    info.email = None;
    info.password = None;

    let second = OrderDraft::new(8, snapshot(1, 300.0, false, 1), info)
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);
    orders::submit(&pool, second).await.unwrap();
    assert_eq!(bookings_of(&pool, 10).await, 2);
}

#[tokio::test]
async fn test_guest_cannot_book_two_slots() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;
    seed_slot(&pool, 11, "BOTH", 5, 0).await;

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10, 11]);

    let err = orders::submit(&pool, draft).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(bookings_of(&pool, 10).await, 0);
    assert_eq!(bookings_of(&pool, 11).await, 0);
}

#[tokio::test]
async fn test_guest_cannot_book_membership_slot() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "MEMBERSHIP", 5, 0).await;

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);

    let err = orders::submit(&pool, draft).await.unwrap_err();
    assert!(matches!(err, AppError::BusinessRule(_)));
    assert_eq!(bookings_of(&pool, 10).await, 0);
}

#[tokio::test]
async fn test_failed_redemption_releases_booked_slots() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;

    // No points earned yet, so the requested reward must be refused
    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10])
        .with_reward(true);

    let err = orders::submit(&pool, draft).await.unwrap_err();
    assert!(matches!(err, AppError::InsufficientPoints { .. }));
    assert_eq!(bookings_of(&pool, 10).await, 0);
}

#[tokio::test]
async fn test_order_with_reward_applies_fixed_value() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;
    loyalty::ensure_account(&pool, 8).await.unwrap();
    loyalty::record_award(&pool, 900, 8, 12).await.unwrap();

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10])
        .with_reward(true);

    let order = orders::submit(&pool, draft).await.unwrap();
    assert!(order.reward_applied);
    assert_eq!(order.reward_value, 25.0);
    // 300 - 25 + 15 delivery fee
    assert_eq!(order.total, 290.0);

    let account = loyalty::find_by_customer(&pool, 8).await.unwrap().unwrap();
    assert_eq!(account.points_redeemed, 12);
    // Points for the new order were still awarded
    assert_eq!(account.total_points_earned, 13);
}

#[tokio::test]
async fn test_cancel_releases_slots_and_reverts_loyalty() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 2).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 2), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);

    let order = orders::submit(&pool, draft).await.unwrap();
    assert_eq!(bookings_of(&pool, 10).await, 1);

    let cancelled = orders::cancel(&pool, order.id).await.unwrap();
    assert_eq!(
        cancelled.status,
        shared::models::OrderStatus::Cancelled
    );
    assert_eq!(bookings_of(&pool, 10).await, 0);

    // Prep tasks follow the order
    let tasks = prep_task::find_all(&pool, None).await.unwrap();
    assert!(tasks
        .iter()
        .all(|t| t.status == shared::models::PrepTaskStatus::Cancelled));

    // Award for the cancelled order is reverted
    let account = loyalty::find_by_customer(&pool, 8).await.unwrap().unwrap();
    assert_eq!(account.total_points_earned, 0);

    // Second cancel must not release capacity again
    let err = orders::cancel(&pool, order.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(bookings_of(&pool, 10).await, 0);
}

#[tokio::test]
async fn test_concurrent_cancels_release_capacity_once() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 3).await;

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);
    let order = orders::submit(&pool, draft).await.unwrap();
    assert_eq!(bookings_of(&pool, 10).await, 4);

    let (a, b) = tokio::join!(
        orders::cancel(&pool, order.id),
        orders::cancel(&pool, order.id),
    );
    let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one cancel may win: {a:?} {b:?}");
    assert_eq!(bookings_of(&pool, 10).await, 3);
}

#[tokio::test]
async fn test_cancel_reverts_redemption_with_the_flip() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;
    loyalty::ensure_account(&pool, 8).await.unwrap();
    loyalty::record_award(&pool, 900, 8, 12).await.unwrap();

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10])
        .with_reward(true);
    let order = orders::submit(&pool, draft).await.unwrap();
    assert!(order.reward_applied);

    orders::cancel(&pool, order.id).await.unwrap();

    // Flip, booking release, award revert and redemption refund landed
    // together
    let account = loyalty::find_by_customer(&pool, 8).await.unwrap().unwrap();
    assert_eq!(account.points_redeemed, 0);
    assert_eq!(account.total_points_earned, 12);
    assert_eq!(bookings_of(&pool, 10).await, 0);
}

#[tokio::test]
async fn test_random_interleavings_keep_bookings_within_capacity() {
    let (_dir, pool) = test_pool().await;
    seed_slot(&pool, 1, "NORMAL", 3, 0).await;
    seed_slot(&pool, 2, "BOTH", 5, 0).await;

    let mut handles = Vec::new();
    for i in 0..32 {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            let slot_id: i64 = if i % 2 == 0 { 1 } else { 2 };
            match slot::commit_bookings(&pool, &[slot_id]).await {
                Ok(()) => {
                    // Low bit of a fresh id as a coin flip
                    let release = shared::util::snowflake_id() & 1 == 1;
                    if release {
                        slot::release_bookings(&pool, &[slot_id]).await.unwrap();
                    }
                    (slot_id, true, release)
                }
                Err(RepoError::CapacityExceeded { .. }) => (slot_id, false, false),
                Err(e) => panic!("unexpected repo error: {e:?}"),
            }
        }));
    }

    let mut held = std::collections::HashMap::from([(1i64, 0i32), (2i64, 0i32)]);
    for handle in handles {
        let (slot_id, committed, released) = handle.await.unwrap();
        if committed && !released {
            *held.get_mut(&slot_id).unwrap() += 1;
        }
    }

    for (slot_id, capacity) in [(1i64, 3i32), (2, 5)] {
        let bookings = bookings_of(&pool, slot_id).await;
        assert!(
            (0..=capacity).contains(&bookings),
            "slot {slot_id} bookings {bookings} outside 0..={capacity}"
        );
        assert_eq!(bookings, held[&slot_id], "slot {slot_id} leaked a booking");
    }
}

#[tokio::test]
async fn test_prep_task_progression_is_guarded() {
    let (_dir, pool) = test_pool().await;
    seed_plan(&pool, 1, 300.0, false, 1).await;
    seed_slot(&pool, 10, "NORMAL", 5, 0).await;

    let draft = OrderDraft::new(8, snapshot(1, 300.0, false, 1), contact())
        .with_meals(vec![MealLine {
            meal_id: 11,
            name: "Lemon Chicken".to_string(),
            quantity: 1,
        }])
        .with_slots(vec![10]);
    orders::submit(&pool, draft).await.unwrap();

    let tasks = prep_task::find_all(&pool, None).await.unwrap();
    let id = tasks[0].id;

    // Skipping a state is rejected
    let err = prep_task::advance_status(&pool, id, shared::models::PrepTaskStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let task = prep_task::advance_status(&pool, id, shared::models::PrepTaskStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(task.status, shared::models::PrepTaskStatus::Preparing);
}
