//! API Route Modules
//!
//! - [`health`] - liveness probe
//! - [`plans`] - subscription plan catalog (read-only)
//! - [`delivery_slots`] - entitlement-filtered slot availability
//! - [`memberships`] - membership creation and lifecycle transitions
//! - [`loyalty`] - loyalty account snapshot
//! - [`orders`] - order submission, lookup and cancellation
//! - [`preparation_tasks`] - kitchen task progression

pub mod delivery_slots;
pub mod health;
pub mod loyalty;
pub mod memberships;
pub mod orders;
pub mod plans;
pub mod preparation_tasks;

use axum::Router;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::core::ServerState;

pub use crate::utils::{AppResponse, AppResult};

/// All routes, without middleware. Used directly by tests.
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(plans::router())
        .merge(delivery_slots::router())
        .merge(memberships::router())
        .merge(loyalty::router())
        .merge(orders::router())
        .merge(preparation_tasks::router())
}

/// Routes plus the middleware stack the server runs with.
pub fn build_app() -> Router<ServerState> {
    build_router()
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
