//! Shared server state

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::core::Config;
use crate::utils::AppError;

/// Server state - holds shared handles used by every request
///
/// The store handle is a process-wide resource established once at startup
/// and cloned into handlers; `Surreal` clones are cheap (shared session).
/// All query operations are read-only and run concurrently without locking;
/// the store's own consistency model is the only ordering guarantee.
#[derive(Clone, Debug)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Document store handle
    pub db: Surreal<Any>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Any>) -> Self {
        Self { config, db }
    }

    /// Initialize server state: connect the store and prepare indexes
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let db = crate::db::connect(config).await?;
        Ok(Self::new(config.clone(), db))
    }
}
