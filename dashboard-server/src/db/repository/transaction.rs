//! Transaction Repository (the ledger)

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::any::Any;

use super::{BaseRepository, CountRow, ListParams, Page, RepoResult, order_by};
use crate::db::models::Transaction;

const TRANSACTION_TABLE: &str = "transaction";

/// Whitelisted sort fields for transaction listings
const SORT_FIELDS: &[&str] = &["cost", "created_at"];

#[derive(Clone)]
pub struct TransactionRepository {
    base: BaseRepository,
}

impl TransactionRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paginated, sorted, searched transaction listing.
    ///
    /// Transactions have no name field; search matches the stringified cost,
    /// mirroring what the dashboard's free-text box filters on.
    pub async fn find_page(&self, params: &ListParams) -> RepoResult<Page<Transaction>> {
        let search = params.search_term();
        let filter = if search.is_some() {
            "string::contains(<string>cost, $search)"
        } else {
            "true"
        };

        let order = order_by(params, SORT_FIELDS, "created_at")?;
        let query = format!(
            "SELECT count() FROM {TRANSACTION_TABLE} WHERE {filter} GROUP ALL;\n\
             SELECT * FROM {TRANSACTION_TABLE} WHERE {filter} {order} LIMIT $limit START $start;"
        );

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("search", search.unwrap_or_default()))
            .bind(("limit", params.page_size() as i64))
            .bind(("start", params.start() as i64))
            .await?;

        let counts: Vec<CountRow> = result.take(0)?;
        let transactions: Vec<Transaction> = result.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page::new(transactions, total, params))
    }

    /// Most recent transactions, newest first
    pub async fn find_recent(&self, limit: u32) -> RepoResult<Vec<Transaction>> {
        let transactions: Vec<Transaction> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {TRANSACTION_TABLE} ORDER BY created_at DESC, id ASC LIMIT $limit"
            ))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;
        Ok(transactions)
    }

    /// Resolve a set of ledger references. Ids that no longer exist simply do
    /// not appear in the result; callers decide how to treat the gap.
    pub async fn find_by_ids(&self, ids: Vec<RecordId>) -> RepoResult<Vec<Transaction>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let transactions: Vec<Transaction> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {TRANSACTION_TABLE} WHERE id IN $ids"
            ))
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(transactions)
    }

    /// The whole ledger, ordered by creation time (rollup builder input)
    pub async fn find_all(&self) -> RepoResult<Vec<Transaction>> {
        let transactions: Vec<Transaction> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {TRANSACTION_TABLE} ORDER BY created_at ASC, id ASC"
            ))
            .await?
            .take(0)?;
        Ok(transactions)
    }
}
