//! Client-facing API module (dashboard data pages)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/client", client_routes())
}

fn client_routes() -> Router<ServerState> {
    Router::new()
        .route("/products", get(handler::list_products))
        .route("/customers", get(handler::list_customers))
        .route("/transactions", get(handler::list_transactions))
        .route("/geography", get(handler::geography))
}
