//! Unified Error Handling
//!
//! Application-wide error type and response envelope.
//!
//! # Error code convention
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx | Generic request errors | E0002 validation failed |
//! | E1xxx | Allocation-core conflicts | E1001 slot capacity exhausted |
//! | E9xxx | System errors | E9002 database error |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;
use crate::slots::SlotError;

/// Unified API response structure
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Request Errors ==========
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    // ========== Allocation-Core Conflicts ==========
    /// A delivery slot filled up concurrently. Recoverable: refresh the
    /// slot list and re-select.
    #[error("Delivery slot {slot_id} has no remaining capacity")]
    CapacityExceeded { slot_id: i64 },

    /// Membership state conflict. Recoverable: refresh membership state.
    #[error("Invalid membership transition: {from} -> {requested}")]
    InvalidTransition { from: String, requested: String },

    /// Reward requested without eligibility. Recoverable: hide reward UI.
    #[error("Insufficient loyalty points: {balance} of {threshold} required")]
    InsufficientPoints { balance: i64, threshold: i64 },

    // ========== System Errors ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.clone())
            }

            AppError::CapacityExceeded { .. } => {
                (StatusCode::CONFLICT, "E1001", self.to_string())
            }
            AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "E1002", self.to_string())
            }
            AppError::InsufficientPoints { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E1003", self.to_string())
            }

            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message,
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::CapacityExceeded { slot_id } => AppError::CapacityExceeded { slot_id },
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<SlotError> for AppError {
    fn from(e: SlotError) -> Self {
        match e {
            SlotError::CapacityExhausted(slot_id) => AppError::CapacityExceeded { slot_id },
            SlotError::NotVisible(_) | SlotError::SelectionFull(_) => {
                AppError::BusinessRule(e.to_string())
            }
        }
    }
}
