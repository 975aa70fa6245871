//! Per-product rollup model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One month of sales figures (month is 1-12)
///
/// Rollups store only observed months; zero-filling months without data is a
/// presentation concern (see `stats::shape`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyDatum {
    pub month: u32,
    pub units_sold: i64,
    pub sales_total: f64,
}

impl MonthlyDatum {
    pub fn empty(month: u32) -> Self {
        Self {
            month,
            units_sold: 0,
            sales_total: 0.0,
        }
    }
}

/// One day of sales figures (date is YYYY-MM-DD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDatum {
    pub date: String,
    pub units_sold: i64,
    pub sales_total: f64,
}

/// Per-product rollup for one year
///
/// Invariants: entries are unique per (product, month) and per (product, day)
/// and chronologically ordered. Rebuilt as a whole by the batch job, never
/// incrementally updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStat {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub year: i32,
    pub yearly_units_sold: i64,
    pub yearly_sales_total: f64,
    pub monthly_data: Vec<MonthlyDatum>,
    pub daily_data: Vec<DailyDatum>,
}
