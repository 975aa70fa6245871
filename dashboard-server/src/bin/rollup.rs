//! Batch rollup rebuild job
//!
//! Scans the ledger and catalog and full-replaces every rollup document.
//! Idempotent, so it is safe to run from cron on any cadence; it shares the
//! store with the live server and requires no coordination with it.
//!
//! Run: `rollup` (same environment variables as the server)

use anyhow::Context;
use dashboard_server::{Config, RollupBuilder, db, init_logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logger();

    let config = Config::from_env().context("configuration")?;
    let store = db::connect(&config).await.context("store connection")?;

    let builder = RollupBuilder::new(store, config.commission_rate);
    let summary = builder
        .rebuild_all()
        .await
        .context("rollup rebuild failed")?;

    tracing::info!(
        transactions = summary.transactions_scanned,
        years = ?summary.years,
        "Rollup rebuild finished"
    );

    Ok(())
}
