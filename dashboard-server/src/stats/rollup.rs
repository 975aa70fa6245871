//! Batch rollup construction
//!
//! Scans the ledger and catalog once and full-replaces every rollup table.
//! Never invoked per request; the `rollup` binary runs it on whatever cadence
//! the operator schedules. Replace-not-merge semantics make the job idempotent:
//! two runs over an unchanged ledger produce identical documents, down to the
//! record keys and ordering.

use std::collections::{BTreeMap, HashSet};

use chrono::Datelike;
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::any::Any;

use crate::db::models::{
    AffiliateStat, DailyDatum, MonthlyDatum, OverallStat, Product, ProductStat, TopProduct,
    Transaction,
};
use crate::db::repository::{
    AffiliateStatRepository, OverallStatRepository, ProductRepository, ProductStatRepository,
    RepoResult, TransactionRepository,
};

/// Number of entries kept in the per-year top products ranking
const TOP_PRODUCTS_LIMIT: usize = 10;

/// What a rebuild wrote
#[derive(Debug, Clone, Serialize)]
pub struct RollupSummary {
    pub transactions_scanned: usize,
    pub years: Vec<i32>,
    pub product_stats_written: usize,
    pub overall_stats_written: usize,
    pub affiliate_stats_updated: usize,
}

/// Batch rollup builder
pub struct RollupBuilder {
    db: Surreal<Any>,
    commission_rate: f64,
}

impl RollupBuilder {
    pub fn new(db: Surreal<Any>, commission_rate: f64) -> Self {
        Self {
            db,
            commission_rate,
        }
    }

    /// Rebuild every rollup from the current ledger and catalog
    pub async fn rebuild_all(&self) -> RepoResult<RollupSummary> {
        let transactions = TransactionRepository::new(self.db.clone()).find_all().await?;
        let products = ProductRepository::new(self.db.clone()).find_all().await?;
        let catalog = index_products(&products);

        tracing::info!(
            transactions = transactions.len(),
            products = products.len(),
            "Rebuilding rollups"
        );

        let product_stats = build_product_stats(&transactions, &catalog);
        let overall_stats = build_overall_stats(&transactions, &catalog);
        let years: Vec<i32> = overall_stats.iter().map(|s| s.year).collect();

        let product_stats_written = ProductStatRepository::new(self.db.clone())
            .replace_all(product_stats)
            .await?;
        let overall_stats_written = OverallStatRepository::new(self.db.clone())
            .replace_all(overall_stats)
            .await?;

        // Affiliate sales lists are ground truth; only the derived totals are
        // recomputed.
        let affiliate_repo = AffiliateStatRepository::new(self.db.clone());
        let affiliate_stats = affiliate_repo.find_all().await?;
        let affiliate_stats_updated = affiliate_stats.len();
        for stat in &affiliate_stats {
            let (volume, commission) = derive_affiliate_totals(stat, self.commission_rate);
            affiliate_repo
                .set_derived_totals(&stat.user, volume, commission)
                .await?;
        }

        let summary = RollupSummary {
            transactions_scanned: transactions.len(),
            years,
            product_stats_written,
            overall_stats_written,
            affiliate_stats_updated,
        };

        tracing::info!(
            years = ?summary.years,
            product_stats = summary.product_stats_written,
            overall_stats = summary.overall_stats_written,
            affiliates = summary.affiliate_stats_updated,
            "Rollup rebuild complete"
        );

        Ok(summary)
    }
}

/// Index the catalog by record id string
fn index_products(products: &[Product]) -> BTreeMap<String, &Product> {
    products
        .iter()
        .filter_map(|p| p.id.as_ref().map(|id| (id.to_string(), p)))
        .collect()
}

/// (year, month, YYYY-MM-DD) from an RFC 3339 timestamp; unparseable
/// timestamps are reported as None and the caller skips the record.
fn time_buckets(created_at: &str) -> Option<(i32, u32, String)> {
    let dt = chrono::DateTime::parse_from_rfc3339(created_at).ok()?;
    Some((dt.year(), dt.month(), dt.format("%Y-%m-%d").to_string()))
}

#[derive(Default)]
struct BucketAcc {
    units: i64,
    revenue: f64,
}

#[derive(Default)]
struct SeriesAcc {
    monthly: BTreeMap<u32, BucketAcc>,
    daily: BTreeMap<String, BucketAcc>,
    yearly_units: i64,
    yearly_revenue: f64,
}

impl SeriesAcc {
    fn add(&mut self, month: u32, date: &str, units: i64, revenue: f64) {
        let m = self.monthly.entry(month).or_default();
        m.units += units;
        m.revenue += revenue;
        let d = self.daily.entry(date.to_string()).or_default();
        d.units += units;
        d.revenue += revenue;
        self.yearly_units += units;
        self.yearly_revenue += revenue;
    }

    fn monthly_data(&self) -> Vec<MonthlyDatum> {
        self.monthly
            .iter()
            .map(|(&month, acc)| MonthlyDatum {
                month,
                units_sold: acc.units,
                sales_total: acc.revenue,
            })
            .collect()
    }

    fn daily_data(&self) -> Vec<DailyDatum> {
        self.daily
            .iter()
            .map(|(date, acc)| DailyDatum {
                date: date.clone(),
                units_sold: acc.units,
                sales_total: acc.revenue,
            })
            .collect()
    }
}

/// Per-product yearly rollups from the ledger.
///
/// The ledger stores only the order total, so line-item revenue is attributed
/// as quantity x catalog price. Line items referencing products missing from
/// the catalog are skipped, not fatal.
pub fn build_product_stats(
    transactions: &[Transaction],
    catalog: &BTreeMap<String, &Product>,
) -> Vec<ProductStat> {
    // BTreeMap keys give a deterministic (product, year) output order
    let mut accs: BTreeMap<(String, i32), (RecordId, SeriesAcc)> = BTreeMap::new();

    for tx in transactions {
        let Some((year, month, date)) = time_buckets(&tx.created_at) else {
            tracing::debug!(created_at = %tx.created_at, "Skipping transaction with unparseable timestamp");
            continue;
        };
        for item in &tx.products {
            let product_key = item.product.to_string();
            let Some(product) = catalog.get(&product_key) else {
                tracing::debug!(product = %product_key, "Skipping line item for unknown product");
                continue;
            };
            let revenue = item.quantity as f64 * product.price;
            let entry = accs
                .entry((product_key, year))
                .or_insert_with(|| (item.product.clone(), SeriesAcc::default()));
            entry.1.add(month, &date, item.quantity, revenue);
        }
    }

    accs.into_iter()
        .map(|((_, year), (product, acc))| ProductStat {
            id: None,
            product,
            year,
            yearly_units_sold: acc.yearly_units,
            yearly_sales_total: acc.yearly_revenue,
            monthly_data: acc.monthly_data(),
            daily_data: acc.daily_data(),
        })
        .collect()
}

/// Site-wide yearly rollups from the ledger.
///
/// Revenue figures use the recorded order totals; unit figures sum line-item
/// quantities; `total_customers` counts distinct buyers seen that year.
pub fn build_overall_stats(
    transactions: &[Transaction],
    catalog: &BTreeMap<String, &Product>,
) -> Vec<OverallStat> {
    struct YearAcc {
        series: SeriesAcc,
        buyers: HashSet<String>,
        // per-product units/revenue for the top list
        per_product: BTreeMap<String, (RecordId, i64, f64)>,
    }

    let mut years: BTreeMap<i32, YearAcc> = BTreeMap::new();

    for tx in transactions {
        let Some((year, month, date)) = time_buckets(&tx.created_at) else {
            continue;
        };
        let units: i64 = tx
            .products
            .iter()
            .map(|item| item.quantity)
            .sum();

        let acc = years.entry(year).or_insert_with(|| YearAcc {
            series: SeriesAcc::default(),
            buyers: HashSet::new(),
            per_product: BTreeMap::new(),
        });
        acc.series.add(month, &date, units, tx.cost);
        acc.buyers.insert(tx.user.to_string());

        for item in &tx.products {
            let product_key = item.product.to_string();
            let Some(product) = catalog.get(&product_key) else {
                continue;
            };
            let revenue = item.quantity as f64 * product.price;
            let entry = acc
                .per_product
                .entry(product_key)
                .or_insert_with(|| (item.product.clone(), 0, 0.0));
            entry.1 += item.quantity;
            entry.2 += revenue;
        }
    }

    years
        .into_iter()
        .map(|(year, acc)| OverallStat {
            id: None,
            year,
            total_customers: acc.buyers.len() as i64,
            yearly_sales_total: acc.series.yearly_revenue,
            yearly_total_sold_units: acc.series.yearly_units,
            monthly_data: acc.series.monthly_data(),
            daily_data: acc.series.daily_data(),
            top_products: rank_top_products(&acc.per_product, catalog),
        })
        .collect()
}

/// Rank products by units sold, descending; ties broken by product id so the
/// ranking is deterministic across rebuilds.
fn rank_top_products(
    per_product: &BTreeMap<String, (RecordId, i64, f64)>,
    catalog: &BTreeMap<String, &Product>,
) -> Vec<TopProduct> {
    let mut ranked: Vec<TopProduct> = per_product
        .iter()
        .filter_map(|(key, (id, units, revenue))| {
            catalog.get(key).map(|product| TopProduct {
                product: id.clone(),
                name: product.name.clone(),
                units_sold: *units,
                sales_total: *revenue,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then_with(|| a.product.to_string().cmp(&b.product.to_string()))
    });
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    ranked
}

/// Derived affiliate figures from the recorded sales list
pub fn derive_affiliate_totals(stat: &AffiliateStat, commission_rate: f64) -> (f64, f64) {
    let volume: f64 = stat.affiliate_sales.iter().map(|s| s.amount).sum();
    (volume, volume * commission_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AffiliateSale, LineItem};

    fn product(key: &str, name: &str, price: f64) -> Product {
        Product {
            id: Some(RecordId::from_table_key("product", key)),
            name: name.to_string(),
            price,
            description: None,
            category: "test".to_string(),
            rating: None,
            supply: None,
        }
    }

    fn tx(user: &str, created_at: &str, cost: f64, items: &[(&str, i64)]) -> Transaction {
        Transaction {
            id: None,
            user: RecordId::from_table_key("user", user),
            products: items
                .iter()
                .map(|(key, quantity)| LineItem {
                    product: RecordId::from_table_key("product", *key),
                    quantity: *quantity,
                })
                .collect(),
            cost,
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn product_stats_bucket_by_month() {
        let products = vec![product("a", "Widget", 2.0)];
        let catalog = index_products(&products);
        let ledger = vec![
            tx("u1", "2023-03-01T09:00:00Z", 8.0, &[("a", 4)]),
            tx("u2", "2023-03-10T09:00:00Z", 6.0, &[("a", 3)]),
            tx("u1", "2023-03-20T09:00:00Z", 6.0, &[("a", 3)]),
            tx("u3", "2023-04-02T09:00:00Z", 4.0, &[("a", 2)]),
            tx("u1", "2023-04-15T09:00:00Z", 6.0, &[("a", 3)]),
        ];

        let stats = build_product_stats(&ledger, &catalog);
        assert_eq!(stats.len(), 1);

        let stat = &stats[0];
        assert_eq!(stat.year, 2023);
        assert_eq!(stat.monthly_data.len(), 2);
        assert_eq!(stat.monthly_data[0].month, 3);
        assert_eq!(stat.monthly_data[0].units_sold, 10);
        assert_eq!(stat.monthly_data[1].month, 4);
        assert_eq!(stat.monthly_data[1].units_sold, 5);
        assert_eq!(stat.yearly_units_sold, 15);
        assert_eq!(stat.yearly_sales_total, 30.0);
    }

    #[test]
    fn unknown_products_are_skipped_not_fatal() {
        let products = vec![product("a", "Widget", 2.0)];
        let catalog = index_products(&products);
        let ledger = vec![tx("u1", "2023-03-01T09:00:00Z", 10.0, &[("a", 1), ("ghost", 5)])];

        let stats = build_product_stats(&ledger, &catalog);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].yearly_units_sold, 1);
    }

    #[test]
    fn overall_stats_count_distinct_buyers_and_split_years() {
        let products = vec![product("a", "Widget", 2.0), product("b", "Gadget", 5.0)];
        let catalog = index_products(&products);
        let ledger = vec![
            tx("u1", "2022-12-31T23:00:00Z", 10.0, &[("a", 5)]),
            tx("u1", "2023-01-01T01:00:00Z", 4.0, &[("a", 2)]),
            tx("u2", "2023-06-01T01:00:00Z", 25.0, &[("b", 5)]),
        ];

        let stats = build_overall_stats(&ledger, &catalog);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].year, 2022);
        assert_eq!(stats[0].total_customers, 1);
        assert_eq!(stats[1].year, 2023);
        assert_eq!(stats[1].total_customers, 2);
        assert_eq!(stats[1].yearly_sales_total, 29.0);
        assert_eq!(stats[1].yearly_total_sold_units, 7);

        // Gadget outsells Widget in units within 2023
        assert_eq!(stats[1].top_products[0].name, "Gadget");
        assert_eq!(stats[1].top_products[0].units_sold, 5);
    }

    #[test]
    fn affiliate_totals_follow_commission_rate() {
        let stat = AffiliateStat {
            id: None,
            user: RecordId::from_table_key("user", "aff"),
            affiliate_sales: vec![
                AffiliateSale {
                    transaction: RecordId::from_table_key("transaction", "t1"),
                    amount: 100.0,
                },
                AffiliateSale {
                    transaction: RecordId::from_table_key("transaction", "t2"),
                    amount: 60.0,
                },
            ],
            total_sales_volume: 0.0,
            total_commission: 0.0,
        };

        let (volume, commission) = derive_affiliate_totals(&stat, 0.05);
        assert_eq!(volume, 160.0);
        assert_eq!(commission, 8.0);
    }
}
