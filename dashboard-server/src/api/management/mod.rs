//! Management API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/management", management_routes())
}

fn management_routes() -> Router<ServerState> {
    Router::new()
        .route("/admins", get(handler::list_admins))
        .route("/performance", get(handler::performance))
}
