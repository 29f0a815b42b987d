//! Membership API Module

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/memberships", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/entitlement", get(handler::get_entitlement))
        .route("/{id}/activate", post(handler::activate))
        .route("/{id}/freeze", post(handler::freeze))
        .route("/{id}/unfreeze", post(handler::unfreeze))
        .route("/{id}/cancel", post(handler::cancel))
}
