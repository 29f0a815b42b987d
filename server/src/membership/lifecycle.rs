use chrono::{Datelike, Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

use crate::db::repository::membership;
use crate::utils::{AppError, AppResult};
use shared::models::{Membership, MembershipStatus};

/// Administrative lifecycle actions.
///
/// Legal moves: PENDING -> ACTIVE (activate), ACTIVE <-> FROZEN
/// (freeze/unfreeze), ACTIVE|FROZEN -> CANCELLED (cancel, terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Activate,
    Freeze,
    Unfreeze,
    Cancel,
}

impl Transition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transition::Activate => "ACTIVATE",
            Transition::Freeze => "FREEZE",
            Transition::Unfreeze => "UNFREEZE",
            Transition::Cancel => "CANCEL",
        }
    }
}

/// First occurrence of the billing day strictly after `from`.
///
/// Billing days are restricted to 1..=28 so the target day exists in
/// every month.
pub fn next_billing_date(from: NaiveDate, billing_day: u32) -> NaiveDate {
    let candidate = from.with_day(billing_day);
    match candidate {
        Some(date) if date > from => date,
        _ => {
            let first_of_next = NaiveDate::from_ymd_opt(
                from.year() + if from.month() == 12 { 1 } else { 0 },
                if from.month() == 12 { 1 } else { from.month() + 1 },
                1,
            )
            .unwrap_or(from + Duration::days(28));
            first_of_next
                .with_day(billing_day)
                .unwrap_or(first_of_next)
        }
    }
}

/// Apply a lifecycle transition.
///
/// The status guard lives in the UPDATE statement. When it misses, the
/// membership is re-read and the caller gets the actual current state in
/// the error, so two racing transitions resolve to one winner and one
/// precise conflict report.
pub async fn apply(pool: &SqlitePool, id: i64, transition: Transition) -> AppResult<Membership> {
    let current = membership::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Membership {id}")))?;

    let now = shared::util::now_millis();
    let applied = match transition {
        Transition::Activate => {
            let billing = next_billing_date(
                Utc::now().date_naive(),
                current.billing_day_of_month as u32,
            );
            membership::try_activate(pool, id, now, &billing.format("%Y-%m-%d").to_string()).await?
        }
        Transition::Freeze => {
            membership::try_set_status(pool, id, MembershipStatus::Active, MembershipStatus::Frozen)
                .await?
        }
        Transition::Unfreeze => {
            membership::try_set_status(pool, id, MembershipStatus::Frozen, MembershipStatus::Active)
                .await?
        }
        Transition::Cancel => membership::try_cancel(pool, id, now).await?,
    };

    if !applied {
        let observed = membership::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Membership {id}")))?;
        return Err(AppError::InvalidTransition {
            from: observed.status.as_str().to_string(),
            requested: transition.as_str().to_string(),
        });
    }

    let updated = membership::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Membership {id}")))?;
    info!(
        membership_id = id,
        transition = transition.as_str(),
        status = updated.status.as_str(),
        "membership transition applied"
    );
    Ok(updated)
}
