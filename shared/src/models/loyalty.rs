//! Loyalty Account Models

use serde::{Deserialize, Serialize};

/// Loyalty account, one per customer.
///
/// `total_points_earned` is monotonically increasing; redemptions are
/// tracked separately in `points_redeemed` so the earned history survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoyaltyAccount {
    pub customer_id: i64,
    pub total_points_earned: i64,
    pub points_redeemed: i64,
    /// Points required before a reward may be redeemed
    pub reward_threshold: i64,
    /// Fixed monetary amount per redemption
    pub reward_value: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl LoyaltyAccount {
    /// Points currently available for redemption
    pub fn balance(&self) -> i64 {
        self.total_points_earned - self.points_redeemed
    }

    pub fn can_redeem(&self) -> bool {
        self.balance() >= self.reward_threshold
    }
}

/// Wire snapshot backing the storefront reward UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltySnapshot {
    pub customer_id: i64,
    pub total_points_earned: i64,
    pub points_redeemed: i64,
    pub balance: i64,
    pub reward_threshold: i64,
    pub reward_value: f64,
    pub can_redeem: bool,
}

impl From<&LoyaltyAccount> for LoyaltySnapshot {
    fn from(account: &LoyaltyAccount) -> Self {
        Self {
            customer_id: account.customer_id,
            total_points_earned: account.total_points_earned,
            points_redeemed: account.points_redeemed,
            balance: account.balance(),
            reward_threshold: account.reward_threshold,
            reward_value: account.reward_value,
            can_redeem: account.can_redeem(),
        }
    }
}
