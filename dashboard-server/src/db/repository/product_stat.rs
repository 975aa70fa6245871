//! Per-product rollup repository
//!
//! Rollup documents use deterministic record keys (`<product>-<year>`) so a
//! rebuild of an unchanged ledger reproduces byte-identical documents.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::any::Any;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::ProductStat;

const PRODUCT_STAT_TABLE: &str = "product_stat";

/// Deterministic record key for a (product, year) rollup
fn stat_key(product: &RecordId, year: i32) -> String {
    format!("{}-{year}", product.key())
}

#[derive(Clone)]
pub struct ProductStatRepository {
    base: BaseRepository,
}

impl ProductStatRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Rollup for one product in one year, if it has been built
    pub async fn find_by_product_year(
        &self,
        product: &RecordId,
        year: i32,
    ) -> RepoResult<Option<ProductStat>> {
        let stat: Option<ProductStat> = self
            .base
            .db()
            .select((PRODUCT_STAT_TABLE, stat_key(product, year)))
            .await?;
        Ok(stat)
    }

    /// Rollups for a set of products in one year (listing join step).
    /// Products without a built rollup are simply absent from the result.
    pub async fn find_for_products(
        &self,
        products: Vec<RecordId>,
        year: i32,
    ) -> RepoResult<Vec<ProductStat>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        // Product references are stored in "table:id" string form
        let ids: Vec<String> = products.iter().map(|p| p.to_string()).collect();
        let stats: Vec<ProductStat> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {PRODUCT_STAT_TABLE} WHERE product IN $products AND year = $year"
            ))
            .bind(("products", ids))
            .bind(("year", year))
            .await?
            .take(0)?;
        Ok(stats)
    }

    /// Full replace: drop every per-product rollup and write the new set.
    /// Replace-not-merge avoids double counting across rebuilds.
    pub async fn replace_all(&self, stats: Vec<ProductStat>) -> RepoResult<usize> {
        self.base
            .db()
            .query(format!("DELETE {PRODUCT_STAT_TABLE}"))
            .await?;

        let count = stats.len();
        for stat in stats {
            let key = stat_key(&stat.product, stat.year);
            let created: Option<ProductStat> = self
                .base
                .db()
                .create((PRODUCT_STAT_TABLE, key))
                .content(stat)
                .await?;
            created.ok_or_else(|| {
                RepoError::Database("Failed to write product_stat rollup".to_string())
            })?;
        }
        Ok(count)
    }
}
