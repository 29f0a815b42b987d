//! Loyalty API Module

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/loyalty", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{customer_id}", get(handler::snapshot))
}
