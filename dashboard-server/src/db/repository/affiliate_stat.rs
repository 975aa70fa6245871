//! Per-affiliate rollup repository
//!
//! Unlike the other rollups, the `affiliate_sales` list is ground truth
//! recorded at attribution time, so the batch job only recomputes the derived
//! totals in place instead of replacing whole documents.

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::any::Any;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AffiliateSale, AffiliateStat};

const AFFILIATE_STAT_TABLE: &str = "affiliate_stat";

#[derive(Clone)]
pub struct AffiliateStatRepository {
    base: BaseRepository,
}

impl AffiliateStatRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All affiliate rollups, ordered by affiliate id for determinism
    pub async fn find_all(&self) -> RepoResult<Vec<AffiliateStat>> {
        let stats: Vec<AffiliateStat> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {AFFILIATE_STAT_TABLE} ORDER BY user ASC"
            ))
            .await?
            .take(0)?;
        Ok(stats)
    }

    /// Rollup for one affiliate user
    pub async fn find_by_user(&self, user: &RecordId) -> RepoResult<Option<AffiliateStat>> {
        let stats: Vec<AffiliateStat> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {AFFILIATE_STAT_TABLE} WHERE user = $user LIMIT 1"
            ))
            .bind(("user", user.to_string()))
            .await?
            .take(0)?;
        Ok(stats.into_iter().next())
    }

    /// Record a new attributed sale (append-only list)
    pub async fn append_sale(&self, user: &RecordId, sale: AffiliateSale) -> RepoResult<()> {
        self.base
            .db()
            .query(format!(
                "UPDATE {AFFILIATE_STAT_TABLE} SET affiliate_sales += $sale WHERE user = $user"
            ))
            .bind(("user", user.to_string()))
            .bind(("sale", sale))
            .await?;
        Ok(())
    }

    /// Overwrite the derived totals for one affiliate (batch job only)
    pub async fn set_derived_totals(
        &self,
        user: &RecordId,
        total_sales_volume: f64,
        total_commission: f64,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query(format!(
                "UPDATE {AFFILIATE_STAT_TABLE} SET \
                 total_sales_volume = $volume, total_commission = $commission \
                 WHERE user = $user"
            ))
            .bind(("user", user.to_string()))
            .bind(("volume", total_sales_volume))
            .bind(("commission", total_commission))
            .await?;
        Ok(())
    }

    /// Create an affiliate rollup document (seed/attribution path)
    pub async fn create(&self, stat: AffiliateStat) -> RepoResult<AffiliateStat> {
        let key = stat.user.key().to_string();
        let created: Option<AffiliateStat> = self
            .base
            .db()
            .create((AFFILIATE_STAT_TABLE, key))
            .content(stat)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create affiliate_stat".to_string()))
    }
}
