//! Dashboard Server - e-commerce analytics backend
//!
//! REST backend over a transactional e-commerce dataset. Serves pass-through
//! listings (products, customers, transactions) and derived statistics:
//! precomputed time-bucketed rollups plus on-demand cross-sectional
//! aggregations (geography, affiliate performance).
//!
//! # Module structure
//!
//! ```text
//! dashboard-server/src/
//! ├── core/          # Config, state, HTTP server
//! ├── db/            # Store connection, models, repositories
//! ├── stats/         # Rollup builder, result shaping, affiliate resolver
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Errors, logging
//! ```
//!
//! Rollups are rebuilt by the separate `rollup` binary, never per request.

pub mod api;
pub mod core;
pub mod db;
pub mod stats;
pub mod utils;

pub use core::{Config, Server, ServerState};
pub use stats::RollupBuilder;
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};
