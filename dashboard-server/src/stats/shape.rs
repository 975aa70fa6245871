//! Presentation shaping
//!
//! Converts engine results into the literal shapes the dashboard consumes:
//! percentage breakdowns, descending sorts, and month-indexed series with
//! zero-fill. Pure functions, no store access.

use serde::Serialize;

use crate::db::models::MonthlyDatum;
use crate::db::repository::user::CountryCount;

/// One geography entry: country, customer count, share of total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographyEntry {
    pub country: String,
    pub count: u64,
    /// Percentage of all counted customers, rounded to two decimals.
    /// Zero when the total is zero, never NaN.
    pub percentage: f64,
}

/// Shape raw per-country counts into a descending percentage breakdown.
/// Ties are broken by country code so the output is deterministic.
pub fn geography_breakdown(mut counts: Vec<CountryCount>) -> Vec<GeographyEntry> {
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));

    let total: u64 = counts.iter().map(|c| c.count).sum();
    counts
        .into_iter()
        .map(|c| {
            let percentage = if total == 0 {
                0.0
            } else {
                round2(c.count as f64 * 100.0 / total as f64)
            };
            GeographyEntry {
                country: c.country,
                count: c.count,
                percentage,
            }
        })
        .collect()
}

/// Expand a sparse monthly series into twelve entries indexed by
/// month-of-year, zero-filling months with no data.
pub fn zero_filled_months(monthly: &[MonthlyDatum]) -> Vec<MonthlyDatum> {
    (1..=12)
        .map(|month| {
            monthly
                .iter()
                .find(|m| m.month == month)
                .cloned()
                .unwrap_or_else(|| MonthlyDatum::empty(month))
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
