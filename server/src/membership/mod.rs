//! Membership Lifecycle
//!
//! State machine for subscription memberships. Transitions are the only
//! way an entitlement set changes; every apply() is serialized through a
//! status-guarded write so concurrent administrative actions cannot both
//! land.

mod lifecycle;

pub use lifecycle::{apply, next_billing_date, Transition};
