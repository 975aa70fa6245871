//! Client API Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Datelike;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{Product, ProductStat, Role, Transaction, User};
use crate::db::repository::{
    ListParams, Page, ProductRepository, ProductStatRepository, TransactionRepository,
    UserRepository,
};
use crate::stats::shape::{self, GeographyEntry};
use crate::utils::AppResult;

/// A product joined with its current-year rollup; `stat` is null when no
/// rollup has been built for the product, which is not an error.
#[derive(Debug, Clone, Serialize)]
pub struct ProductWithStat {
    #[serde(flatten)]
    pub product: Product,
    pub stat: Option<ProductStat>,
}

/// GET /api/client/products - paginated product listing with stats
pub async fn list_products(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Page<ProductWithStat>>> {
    let page = ProductRepository::new(state.db.clone())
        .find_page(&params)
        .await?;

    // Explicit join step: fetch this page's rollups in one query, stitch by id
    let year = chrono::Utc::now().year();
    let ids: Vec<_> = page
        .items
        .iter()
        .filter_map(|p| p.id.clone())
        .collect();
    let stats = ProductStatRepository::new(state.db.clone())
        .find_for_products(ids, year)
        .await?;
    let mut by_product: HashMap<String, ProductStat> = stats
        .into_iter()
        .map(|s| (s.product.to_string(), s))
        .collect();

    let joined = page.map(|product| {
        let stat = product
            .id
            .as_ref()
            .and_then(|id| by_product.remove(&id.to_string()));
        ProductWithStat { product, stat }
    });

    Ok(Json(joined))
}

/// GET /api/client/customers - paginated non-admin user listing
pub async fn list_customers(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Page<User>>> {
    let page = UserRepository::new(state.db.clone())
        .find_page(Role::User, &params)
        .await?;
    Ok(Json(page))
}

/// GET /api/client/transactions - paginated transaction listing
pub async fn list_transactions(
    State(state): State<ServerState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Page<Transaction>>> {
    let page = TransactionRepository::new(state.db.clone())
        .find_page(&params)
        .await?;
    Ok(Json(page))
}

/// GET /api/client/geography - customers per country with share of total
pub async fn geography(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<GeographyEntry>>> {
    let counts = UserRepository::new(state.db.clone()).geography().await?;
    Ok(Json(shape::geography_breakdown(counts)))
}
