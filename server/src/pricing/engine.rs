use rust_decimal::Decimal;
use serde::Serialize;

use shared::models::{DrinkLine, Entitlement, PlanSnapshot};

use super::money::{round_money, to_decimal, to_f64};

/// Server-computed order amounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    /// Amount deducted by an applied loyalty reward, zero otherwise
    pub reward_value: f64,
    pub total: f64,
}

/// Compute order totals from the plan snapshot, drink add-ons, the
/// customer's entitlement and an optionally redeemed reward.
///
/// The membership discount applies to the full subtotal. A reward is
/// subtracted after the discount and cannot push the pre-fee amount
/// below zero. The delivery fee is waived for free-shipping plans and
/// never discounted.
pub fn compute(
    plan: &PlanSnapshot,
    drinks: &[DrinkLine],
    entitlement: &Entitlement,
    reward_value: Option<f64>,
) -> Totals {
    let mut subtotal = to_decimal(plan.price_per_week);
    for drink in drinks {
        subtotal += to_decimal(drink.price) * Decimal::from(drink.quantity);
    }

    let discount = if entitlement.discount_percent > 0.0 {
        subtotal * to_decimal(entitlement.discount_percent) / Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    let delivery_fee = if plan.is_free_shipping {
        Decimal::ZERO
    } else {
        to_decimal(plan.delivery_fee)
    };

    let reward = reward_value.map(to_decimal).unwrap_or(Decimal::ZERO);
    let after_reward = (subtotal - discount - reward).max(Decimal::ZERO);

    let total = round_money(after_reward + delivery_fee);

    Totals {
        subtotal: to_f64(subtotal),
        discount: to_f64(discount),
        delivery_fee: to_f64(delivery_fee),
        reward_value: to_f64(reward),
        total: to_f64(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::SlotType;

    fn make_plan(price: f64, fee: f64, free_shipping: bool) -> PlanSnapshot {
        PlanSnapshot {
            plan_id: 1,
            name: "Family Weekly".to_string(),
            price_per_week: price,
            delivery_fee: fee,
            is_free_shipping: free_shipping,
            points_value: 1,
        }
    }

    fn drink(price: f64, quantity: i32) -> DrinkLine {
        DrinkLine {
            drink_id: 1,
            name: "Fresh Juice".to_string(),
            price,
            quantity,
        }
    }

    fn entitlement(discount: f64) -> Entitlement {
        Entitlement {
            max_slots: 2,
            visible_slot_types: vec![SlotType::Membership, SlotType::Both],
            discount_percent: discount,
            free_dessert_quota: 0,
        }
    }

    #[test]
    fn test_member_order_with_free_shipping() {
        let plan = make_plan(500.0, 15.0, true);
        let drinks = vec![drink(20.0, 2)];
        let totals = compute(&plan, &drinks, &entitlement(10.0), None);

        assert_eq!(totals.subtotal, 540.0);
        assert_eq!(totals.discount, 54.0);
        assert_eq!(totals.delivery_fee, 0.0);
        assert_eq!(totals.total, 486.0);
    }

    #[test]
    fn test_non_member_pays_delivery_fee() {
        let plan = make_plan(300.0, 25.0, false);
        let totals = compute(&plan, &[], &entitlement(0.0), None);

        assert_eq!(totals.subtotal, 300.0);
        assert_eq!(totals.discount, 0.0);
        assert_eq!(totals.delivery_fee, 25.0);
        assert_eq!(totals.total, 325.0);
    }

    #[test]
    fn test_reward_is_subtracted_after_discount() {
        let plan = make_plan(100.0, 0.0, true);
        let totals = compute(&plan, &[], &entitlement(10.0), Some(25.0));

        assert_eq!(totals.discount, 10.0);
        assert_eq!(totals.reward_value, 25.0);
        assert_eq!(totals.total, 65.0);
    }

    #[test]
    fn test_reward_floors_at_zero_but_fee_survives() {
        let plan = make_plan(10.0, 5.0, false);
        let totals = compute(&plan, &[], &entitlement(0.0), Some(25.0));

        // Reward cannot make the pre-fee amount negative
        assert_eq!(totals.total, 5.0);
    }

    #[test]
    fn test_adding_an_addon_never_decreases_total() {
        let plan = make_plan(200.0, 10.0, false);
        let ent = entitlement(15.0);

        let base = compute(&plan, &[], &ent, None);
        let with_one = compute(&plan, &[drink(12.5, 1)], &ent, None);
        let with_two = compute(&plan, &[drink(12.5, 1), drink(8.0, 3)], &ent, None);

        assert!(with_one.total >= base.total);
        assert!(with_two.total >= with_one.total);
    }

    #[test]
    fn test_discount_never_increases_total() {
        let plan = make_plan(200.0, 10.0, false);
        let drinks = vec![drink(12.5, 2)];

        let without = compute(&plan, &drinks, &entitlement(0.0), None);
        let with = compute(&plan, &drinks, &entitlement(20.0), None);

        assert!(with.total <= without.total);
    }

    #[test]
    fn test_rounding_applied_once_at_total() {
        // 33.33 * 3% discount produces repeating intermediates
        let plan = make_plan(33.33, 0.0, true);
        let totals = compute(&plan, &[], &entitlement(3.0), None);

        // 33.33 - 0.9999 = 32.3301, rounds to 32.33
        assert_eq!(totals.total, 32.33);
        assert!((totals.discount - 0.9999).abs() < 1e-9);
    }
}
