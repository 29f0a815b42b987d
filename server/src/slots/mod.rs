//! Slot Allocator
//!
//! In-memory selection toggling plus availability listing. Persistent
//! capacity accounting lives in the slot repository; this module only
//! decides which slots a customer may pick and how the picker behaves.

mod allocator;

pub use allocator::{list_available, SlotSelection};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Delivery slot {0} is fully booked")]
    CapacityExhausted(i64),
    #[error("Delivery slot {0} is not available for this membership tier")]
    NotVisible(i64),
    #[error("Selection already holds the maximum of {0} slots")]
    SelectionFull(usize),
}
