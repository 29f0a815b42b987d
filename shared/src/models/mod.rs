//! Data Models
//!
//! Domain entities shared between the server and its clients. All models
//! serialize with serde; sqlx row derives are gated behind the `db` feature.

pub mod delivery_slot;
pub mod entitlement;
pub mod loyalty;
pub mod membership;
pub mod order;
pub mod plan;
pub mod preparation_task;

pub use delivery_slot::{DeliverySlot, SlotAvailability, SlotType};
pub use entitlement::Entitlement;
pub use loyalty::{LoyaltyAccount, LoyaltySnapshot};
pub use membership::{Membership, MembershipCreate, MembershipPlan, MembershipStatus};
pub use order::{CustomerInfo, DrinkLine, MealLine, Order, OrderStatus, PaymentMethod};
pub use plan::{Plan, PlanSnapshot};
pub use preparation_task::{MealPreparationTask, PrepTaskStatus};
