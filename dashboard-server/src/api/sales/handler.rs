//! Sales API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{DailyDatum, MonthlyDatum, OverallStat, TopProduct};
use crate::db::repository::OverallStatRepository;
use crate::stats::shape;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct OverallStatsQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
}

/// Overall statistics shaped for the dashboard: the monthly series always has
/// twelve entries, zero-filled where the rollup recorded no data.
#[derive(Debug, Clone, Serialize)]
pub struct OverallStatsResponse {
    pub year: i32,
    pub total_customers: i64,
    pub yearly_sales_total: f64,
    pub yearly_total_sold_units: i64,
    pub monthly_data: Vec<MonthlyDatum>,
    pub daily_data: Vec<DailyDatum>,
    pub top_products: Vec<TopProduct>,
}

impl From<OverallStat> for OverallStatsResponse {
    fn from(stat: OverallStat) -> Self {
        Self {
            year: stat.year,
            total_customers: stat.total_customers,
            yearly_sales_total: stat.yearly_sales_total,
            yearly_total_sold_units: stat.yearly_total_sold_units,
            monthly_data: shape::zero_filled_months(&stat.monthly_data),
            daily_data: stat.daily_data,
            top_products: stat.top_products,
        }
    }
}

/// GET /api/sales/overall - OverallStat for the requested year
///
/// A year with no rebuilt rollup is reported as "no data for period", never a
/// zero-filled synthetic document: callers must be able to distinguish zero
/// sales from a missing rollup.
pub async fn overall_stats(
    State(state): State<ServerState>,
    Query(query): Query<OverallStatsQuery>,
) -> AppResult<Json<OverallStatsResponse>> {
    let year = query.year.unwrap_or_else(|| chrono::Utc::now().year());

    let stat = OverallStatRepository::new(state.db.clone())
        .find_by_year(year)
        .await?
        .ok_or_else(|| AppError::no_data(format!("No sales data for year {year}")))?;

    Ok(Json(stat.into()))
}
