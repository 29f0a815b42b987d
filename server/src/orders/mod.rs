//! Order Assembler
//!
//! Composes entitlement, slot allocation, loyalty and pricing into a
//! single validated order submission, with compensation for every
//! partially-applied side effect.

mod assembler;
mod draft;

pub use assembler::{cancel, submit};
pub use draft::OrderDraft;
