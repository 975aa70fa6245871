//! Site-wide rollup repository

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::OverallStat;

const OVERALL_STAT_TABLE: &str = "overall_stat";

#[derive(Clone)]
pub struct OverallStatRepository {
    base: BaseRepository,
}

impl OverallStatRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Rollup for one year. `None` means "no data for period" - callers must
    /// not substitute a zero-filled document.
    pub async fn find_by_year(&self, year: i32) -> RepoResult<Option<OverallStat>> {
        let stat: Option<OverallStat> = self
            .base
            .db()
            .select((OVERALL_STAT_TABLE, year.to_string()))
            .await?;
        Ok(stat)
    }

    /// Full replace: drop every yearly rollup and write the new set.
    /// Record keys are the year itself, so at most one document per year can
    /// exist and rebuilds are idempotent.
    pub async fn replace_all(&self, stats: Vec<OverallStat>) -> RepoResult<usize> {
        self.base
            .db()
            .query(format!("DELETE {OVERALL_STAT_TABLE}"))
            .await?;

        let count = stats.len();
        for stat in stats {
            let key = stat.year.to_string();
            let created: Option<OverallStat> = self
                .base
                .db()
                .create((OVERALL_STAT_TABLE, key))
                .content(stat)
                .await?;
            created.ok_or_else(|| {
                RepoError::Database("Failed to write overall_stat rollup".to_string())
            })?;
        }
        Ok(count)
    }
}
