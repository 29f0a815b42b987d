//! Shared types for the Pantry meal-delivery platform
//!
//! Data models and small utilities used by the server (and any future
//! client crates). Database derives are gated behind the `db` feature so
//! wire-only consumers do not pull in sqlx.

pub mod models;
pub mod util;
