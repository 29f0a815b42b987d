//! Loyalty Ledger
//!
//! Points accrue when orders complete and unlock a fixed-value reward
//! once the configured threshold is reached. The ledger is the only
//! writer of loyalty balances.

mod ledger;

pub use ledger::{award_for_order, can_redeem, redeem, snapshot};
