//! General API module (dashboard summary, user lookup)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/general", general_routes())
}

fn general_routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/users/{id}", get(handler::get_user))
}
