//! Management API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::models::{Role, User};
use crate::db::repository::{ListParams, Page, UserRepository};
use crate::stats::{AffiliatePerformance, affiliate_performance};
use crate::utils::AppResult;

/// GET /api/management/admins - paginated admin-role user listing
pub async fn list_admins(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Page<User>>> {
    let page = UserRepository::new(state.db.clone())
        .find_page(Role::Admin, &params)
        .await?;
    Ok(Json(page))
}

/// GET /api/management/performance - per-affiliate resolved sales breakdown,
/// ranked by sales volume
pub async fn performance(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<AffiliatePerformance>>> {
    let performances = affiliate_performance(state.db.clone()).await?;
    Ok(Json(performances))
}
