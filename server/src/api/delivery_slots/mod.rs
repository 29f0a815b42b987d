//! Delivery Slot API Module

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/delivery-slots", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list_available))
}
