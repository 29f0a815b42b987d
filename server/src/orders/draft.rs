use crate::utils::{AppError, AppResult};
use shared::models::{
    CustomerInfo, DrinkLine, Entitlement, MealLine, PaymentMethod, PlanSnapshot,
};

/// Immutable per-step order under construction.
///
/// Each `with_*` step consumes the draft and returns a new one, so every
/// stage of checkout can be validated and tested in isolation without
/// shared mutable state.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub plan: PlanSnapshot,
    pub meals: Vec<MealLine>,
    pub drinks: Vec<DrinkLine>,
    pub slot_ids: Vec<i64>,
    pub payment_method: PaymentMethod,
    pub customer_info: CustomerInfo,
    pub reward_requested: bool,
    /// Client-computed total, advisory only
    pub client_total: Option<f64>,
    /// Whether the customer already has a record with us; guest
    /// checkout must carry credentials so an account can be created
    pub has_existing_account: bool,
}

impl OrderDraft {
    pub fn new(customer_id: i64, plan: PlanSnapshot, customer_info: CustomerInfo) -> Self {
        Self {
            customer_id,
            plan,
            meals: Vec::new(),
            drinks: Vec::new(),
            slot_ids: Vec::new(),
            payment_method: PaymentMethod::Cod,
            customer_info,
            reward_requested: false,
            client_total: None,
            has_existing_account: false,
        }
    }

    pub fn with_meals(mut self, meals: Vec<MealLine>) -> Self {
        self.meals = meals;
        self
    }

    pub fn with_drinks(mut self, drinks: Vec<DrinkLine>) -> Self {
        self.drinks = drinks;
        self
    }

    pub fn with_slots(mut self, slot_ids: Vec<i64>) -> Self {
        self.slot_ids = slot_ids;
        self
    }

    pub fn with_payment(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    pub fn with_reward(mut self, requested: bool) -> Self {
        self.reward_requested = requested;
        self
    }

    pub fn with_client_total(mut self, total: Option<f64>) -> Self {
        self.client_total = total;
        self
    }

    pub fn with_existing_account(mut self, has_account: bool) -> Self {
        self.has_existing_account = has_account;
        self
    }

    /// Final validation before any side effect runs.
    pub fn validate(&self, entitlement: &Entitlement) -> AppResult<()> {
        if self.slot_ids.is_empty() {
            return Err(AppError::Validation(
                "At least one delivery slot must be selected".into(),
            ));
        }
        if self.slot_ids.len() > entitlement.max_slots {
            return Err(AppError::Validation(format!(
                "Selection holds {} slots but the membership tier allows {}",
                self.slot_ids.len(),
                entitlement.max_slots
            )));
        }
        let mut seen = self.slot_ids.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != self.slot_ids.len() {
            return Err(AppError::Validation(
                "Duplicate delivery slot in selection".into(),
            ));
        }

        if self.meals.is_empty() {
            return Err(AppError::Validation("Order contains no meals".into()));
        }
        for meal in &self.meals {
            if meal.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Meal '{}' has non-positive quantity",
                    meal.name
                )));
            }
        }
        for drink in &self.drinks {
            if drink.quantity <= 0 {
                return Err(AppError::Validation(format!(
                    "Drink '{}' has non-positive quantity",
                    drink.name
                )));
            }
            if drink.price < 0.0 {
                return Err(AppError::Validation(format!(
                    "Drink '{}' has negative price",
                    drink.name
                )));
            }
        }

        let info = &self.customer_info;
        if info.first_name.trim().is_empty()
            || info.last_name.trim().is_empty()
            || info.phone_number.trim().is_empty()
            || info.address.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Delivery contact details are incomplete".into(),
            ));
        }

        if !self.has_existing_account {
            let email_ok = info
                .email
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty());
            let password_ok = info
                .password
                .as_deref()
                .is_some_and(|p| !p.trim().is_empty());
            if !email_ok || !password_ok {
                return Err(AppError::Validation(
                    "Guest checkout requires email and password to create an account".into(),
                ));
            }
        }

        Ok(())
    }
}
