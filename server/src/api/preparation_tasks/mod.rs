//! Meal Preparation Task API Module

mod handler;

use axum::{
    routing::{get, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/preparation-tasks", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}/status", put(handler::update_status))
}
