//! Sales statistics API module

pub mod handler;

pub use handler::OverallStatsResponse;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sales/overall", get(handler::overall_stats))
}
