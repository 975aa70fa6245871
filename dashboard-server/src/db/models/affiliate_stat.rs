//! Per-affiliate rollup model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// A sale attributed to an affiliate: ledger reference plus amount captured
/// at attribution time. The list is append-only and is ground truth for
/// attribution (the ledger does not record which affiliate drove a sale).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateSale {
    #[serde(with = "serde_helpers::record_id")]
    pub transaction: RecordId,
    pub amount: f64,
}

/// Per-affiliate rollup, keyed uniquely by affiliate user id.
///
/// `total_sales_volume` and `total_commission` are derived figures recomputed
/// by the batch job from the recorded sales list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateStat {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub affiliate_sales: Vec<AffiliateSale>,
    #[serde(default)]
    pub total_sales_volume: f64,
    #[serde(default)]
    pub total_commission: f64,
}
