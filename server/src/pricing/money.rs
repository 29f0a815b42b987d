//! Monetary arithmetic helpers
//!
//! Currency amounts are stored as f64 in models but every computation
//! converts to `Decimal` first. Intermediate line items stay unrounded;
//! only the final total is rounded to two decimal places.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance when comparing client-advisory amounts against the
/// server-computed ones
pub const MONEY_TOLERANCE: f64 = 0.01;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Round to 2 decimal places, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn money_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < MONEY_TOLERANCE
}
