//! Database Module
//!
//! SurrealDB connection handling. The engine is selected by the connection
//! string scheme (`rocksdb://`, `ws://`, `mem://` in tests), so the same code
//! path serves embedded and remote deployments.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};

use crate::core::Config;
use crate::utils::AppError;

/// Connect to the document store and select namespace/database
pub async fn connect(config: &Config) -> Result<Surreal<Any>, AppError> {
    let db = any::connect(&config.database_url).await.map_err(|e| {
        AppError::Database(format!(
            "Failed to connect to {}: {e}",
            config.database_url
        ))
    })?;

    db.use_ns(&config.namespace)
        .use_db(&config.database)
        .await
        .map_err(|e| AppError::Database(format!("Failed to select namespace: {e}")))?;

    define_indexes(&db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to define indexes: {e}")))?;

    tracing::info!(url = %config.database_url, ns = %config.namespace, "Store connection established");

    Ok(db)
}

/// Define uniqueness indexes backing the rollup invariants:
/// at most one overall_stat per year, one affiliate_stat per user.
pub async fn define_indexes(db: &Surreal<Any>) -> Result<(), surrealdb::Error> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS overall_stat_year ON overall_stat FIELDS year UNIQUE;
        DEFINE INDEX IF NOT EXISTS affiliate_stat_user ON affiliate_stat FIELDS user UNIQUE;
        "#,
    )
    .await?;
    Ok(())
}
