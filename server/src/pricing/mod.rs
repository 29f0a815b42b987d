//! Pricing Engine
//!
//! Server-authoritative order pricing. All arithmetic runs on decimals;
//! rounding happens exactly once, at the final total.

mod engine;
mod money;

pub use engine::{compute, Totals};
pub use money::{money_eq, round_money, to_decimal, to_f64, MONEY_TOLERANCE};
