//! Affiliate performance resolution
//!
//! An affiliate's sales list holds ledger references, not embedded documents,
//! so answering "which affiliate drove which sales" requires an explicit join
//! against the ledger and catalog. The missing-reference policy is
//! skip-and-continue: a transaction id that no longer resolves (e.g. pruned
//! from the ledger) is dropped from the result and counted in
//! `skipped_references`, never an error.

use std::collections::HashMap;

use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::db::models::{AffiliateStat, Product, Role, Transaction, User};
use crate::db::repository::{
    AffiliateStatRepository, ProductRepository, RepoResult, TransactionRepository, UserRepository,
};

/// A line item of a resolved sale, joined back to the catalog
#[derive(Debug, Clone, Serialize)]
pub struct SoldItem {
    pub product: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// One attributed sale resolved against the ledger
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSale {
    pub transaction: String,
    /// Amount recorded at attribution time
    pub amount: f64,
    pub created_at: String,
    pub items: Vec<SoldItem>,
}

/// Performance record for one affiliate
#[derive(Debug, Clone, Serialize)]
pub struct AffiliatePerformance {
    pub user: User,
    /// Stored derived totals (as of the last rollup rebuild)
    pub total_sales_volume: f64,
    pub total_commission: f64,
    /// Sum of amounts whose ledger reference still resolves; equals
    /// `total_sales_volume` unless references were skipped
    pub resolved_volume: f64,
    pub skipped_references: u64,
    pub sales: Vec<ResolvedSale>,
}

/// Join one affiliate's recorded sales against ledger and catalog snapshots
pub fn assemble(
    user: User,
    stat: Option<&AffiliateStat>,
    ledger: &HashMap<String, Transaction>,
    catalog: &HashMap<String, Product>,
) -> AffiliatePerformance {
    let mut sales = Vec::new();
    let mut resolved_volume = 0.0;
    let mut skipped_references = 0u64;

    if let Some(stat) = stat {
        for sale in &stat.affiliate_sales {
            let key = sale.transaction.to_string();
            let Some(tx) = ledger.get(&key) else {
                tracing::debug!(transaction = %key, "Skipping missing ledger reference");
                skipped_references += 1;
                continue;
            };

            let items = tx
                .products
                .iter()
                .filter_map(|item| {
                    let product_key = item.product.to_string();
                    catalog.get(&product_key).map(|product| SoldItem {
                        product: product_key.clone(),
                        name: product.name.clone(),
                        quantity: item.quantity,
                        price: product.price,
                    })
                })
                .collect();

            resolved_volume += sale.amount;
            sales.push(ResolvedSale {
                transaction: key,
                amount: sale.amount,
                created_at: tx.created_at.clone(),
                items,
            });
        }
    }

    AffiliatePerformance {
        user,
        total_sales_volume: stat.map(|s| s.total_sales_volume).unwrap_or(0.0),
        total_commission: stat.map(|s| s.total_commission).unwrap_or(0.0),
        resolved_volume,
        skipped_references,
        sales,
    }
}

/// Performance records for every affiliate, ranked by sales volume
pub async fn affiliate_performance(db: Surreal<Any>) -> RepoResult<Vec<AffiliatePerformance>> {
    let affiliates = UserRepository::new(db.clone())
        .find_all_by_role(Role::Superadmin)
        .await?;
    let stats = AffiliateStatRepository::new(db.clone()).find_all().await?;

    let stats_by_user: HashMap<String, AffiliateStat> = stats
        .into_iter()
        .map(|s| (s.user.to_string(), s))
        .collect();

    // Resolve every referenced transaction in one pass over the ledger
    let referenced: Vec<surrealdb::RecordId> = stats_by_user
        .values()
        .flat_map(|s| s.affiliate_sales.iter().map(|sale| sale.transaction.clone()))
        .collect();
    let ledger: HashMap<String, Transaction> = TransactionRepository::new(db.clone())
        .find_by_ids(referenced)
        .await?
        .into_iter()
        .filter_map(|tx| tx.id.as_ref().map(|id| (id.to_string(), tx.clone())))
        .collect();

    let catalog: HashMap<String, Product> = ProductRepository::new(db)
        .find_all()
        .await?
        .into_iter()
        .filter_map(|p| p.id.as_ref().map(|id| (id.to_string(), p.clone())))
        .collect();

    let mut performances: Vec<AffiliatePerformance> = affiliates
        .into_iter()
        .map(|user| {
            let stat = user
                .id
                .as_ref()
                .and_then(|id| stats_by_user.get(&id.to_string()));
            assemble(user, stat, &ledger, &catalog)
        })
        .collect();

    performances.sort_by(|a, b| {
        b.total_sales_volume
            .total_cmp(&a.total_sales_volume)
            .then_with(|| {
                let a_id = a.user.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                let b_id = b.user.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
                a_id.cmp(&b_id)
            })
    });

    Ok(performances)
}
