//! Site-wide rollup model

use super::product_stat::{DailyDatum, MonthlyDatum};
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Ranked entry in the top-products list (descending by units sold)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub name: String,
    pub units_sold: i64,
    pub sales_total: f64,
}

/// Site-wide rollup for one year; at most one document per year value
/// (enforced by a unique index on `year`).
///
/// Absence of this document for a year means "no data for period", which is
/// reported distinctly from a zero-valued rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallStat {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub year: i32,
    /// Distinct buyers seen in the ledger for this year
    pub total_customers: i64,
    pub yearly_sales_total: f64,
    pub yearly_total_sold_units: i64,
    pub monthly_data: Vec<MonthlyDatum>,
    pub daily_data: Vec<DailyDatum>,
    pub top_products: Vec<TopProduct>,
}
