//! Transaction Model (the ledger)

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Transaction ID type
pub type TransactionId = RecordId;

/// A purchased line item: product reference plus quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    pub quantity: i64,
}

/// A single purchase event. Immutable once recorded; the ground truth from
/// which all statistics derive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<TransactionId>,
    /// Buyer reference
    #[serde(with = "serde_helpers::record_id")]
    pub user: RecordId,
    pub products: Vec<LineItem>,
    /// Monetary total for the whole order
    pub cost: f64,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}
