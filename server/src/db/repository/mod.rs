//! Repository Module
//!
//! Data access for the allocation core. Repositories are plain async
//! functions over `&SqlitePool`; every state-changing rule (capacity,
//! membership status, loyalty balance) is enforced with a conditional
//! UPDATE so concurrent writers cannot race past a stale read.

pub mod loyalty;
pub mod membership;
pub mod order;
pub mod plan;
pub mod prep_task;
pub mod slot;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Delivery slot {slot_id} has no remaining capacity")]
    CapacityExceeded { slot_id: i64 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
