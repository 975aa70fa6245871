//! Data models
//!
//! Ground truth: [`Transaction`] (ledger), [`User`] and [`Product`] (catalog).
//! Derived rollups: [`ProductStat`], [`OverallStat`], [`AffiliateStat`] - these
//! hold ids plus denormalized numeric summaries only and may be discarded and
//! rebuilt at any time.

pub mod affiliate_stat;
pub mod overall_stat;
pub mod product;
pub mod product_stat;
pub mod serde_helpers;
pub mod transaction;
pub mod user;

pub use affiliate_stat::{AffiliateSale, AffiliateStat};
pub use overall_stat::{OverallStat, TopProduct};
pub use product::Product;
pub use product_stat::{DailyDatum, MonthlyDatum, ProductStat};
pub use transaction::{LineItem, Transaction};
pub use user::{Role, User};
