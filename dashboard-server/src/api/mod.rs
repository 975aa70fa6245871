//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`client`] - products, customers, transactions, geography
//! - [`management`] - admins listing, affiliate performance
//! - [`sales`] - overall statistics
//! - [`general`] - dashboard summary, single user lookup

pub mod client;
pub mod general;
pub mod health;
pub mod management;
pub mod sales;

use axum::Router;

use crate::core::ServerState;

/// Assemble the full route tree
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(client::router())
        .merge(management::router())
        .merge(sales::router())
        .merge(general::router())
}
