//! Statistics subsystem
//!
//! - [`rollup`] - batch rollup construction (full replace, idempotent)
//! - [`shape`] - presentation shaping (percentages, zero-filled series)
//! - [`performance`] - affiliate performance resolution against the ledger

pub mod performance;
pub mod rollup;
pub mod shape;

pub use performance::{AffiliatePerformance, affiliate_performance};
pub use rollup::{RollupBuilder, RollupSummary};
