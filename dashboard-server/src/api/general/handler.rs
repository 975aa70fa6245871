//! General API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Datelike;
use serde::Serialize;

use crate::core::ServerState;
use crate::db::models::{DailyDatum, MonthlyDatum, TopProduct, Transaction, User};
use crate::db::repository::{OverallStatRepository, TransactionRepository, UserRepository};
use crate::stats::shape;
use crate::utils::{AppError, AppResult};

/// How many recent transactions the dashboard summary carries
const RECENT_TRANSACTIONS_LIMIT: u32 = 50;

/// Dashboard landing-page summary: headline figures for the current year,
/// the current month/day slice of the rollup, and the latest transactions.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub year: i32,
    pub month: u32,
    pub day: String,
    pub total_customers: i64,
    pub yearly_sales_total: f64,
    pub yearly_total_sold_units: i64,
    /// Current month's entry from the rollup, if any sales were recorded
    pub this_month_stats: Option<MonthlyDatum>,
    /// Today's entry from the rollup, if any sales were recorded
    pub today_stats: Option<DailyDatum>,
    pub monthly_data: Vec<MonthlyDatum>,
    pub top_products: Vec<TopProduct>,
    pub recent_transactions: Vec<Transaction>,
}

/// GET /api/general/dashboard - dashboard summary
///
/// Reports "no data for period" when the current year has no rebuilt rollup.
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardResponse>> {
    let now = chrono::Utc::now();
    let year = now.year();
    let month = now.month();
    let day = now.format("%Y-%m-%d").to_string();

    let stat = OverallStatRepository::new(state.db.clone())
        .find_by_year(year)
        .await?
        .ok_or_else(|| AppError::no_data(format!("No sales data for year {year}")))?;

    let recent_transactions = TransactionRepository::new(state.db.clone())
        .find_recent(RECENT_TRANSACTIONS_LIMIT)
        .await?;

    let this_month_stats = stat.monthly_data.iter().find(|m| m.month == month).cloned();
    let today_stats = stat.daily_data.iter().find(|d| d.date == day).cloned();

    Ok(Json(DashboardResponse {
        year,
        month,
        day,
        total_customers: stat.total_customers,
        yearly_sales_total: stat.yearly_sales_total,
        yearly_total_sold_units: stat.yearly_total_sold_units,
        this_month_stats,
        today_stats,
        monthly_data: shape::zero_filled_months(&stat.monthly_data),
        top_products: stat.top_products,
        recent_transactions,
    }))
}

/// GET /api/general/users/:id - single user lookup
pub async fn get_user(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    let user = UserRepository::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id}")))?;
    Ok(Json(user))
}
