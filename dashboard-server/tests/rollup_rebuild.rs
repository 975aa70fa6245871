//! Rollup rebuild integration tests against an in-memory store
//! Run: cargo test -p dashboard-server --test rollup_rebuild

use dashboard_server::db;
use dashboard_server::db::models::{
    AffiliateSale, AffiliateStat, LineItem, Product, Role, Transaction, User,
};
use dashboard_server::db::repository::{
    AffiliateStatRepository, OverallStatRepository, ProductStatRepository,
};
use dashboard_server::stats::RollupBuilder;
use surrealdb::engine::any::{self, Any};
use surrealdb::{RecordId, Surreal};

async fn test_db() -> Surreal<Any> {
    let store = any::connect("mem://").await.unwrap();
    store.use_ns("test").use_db("test").await.unwrap();
    db::define_indexes(&store).await.unwrap();
    store
}

async fn seed_product(store: &Surreal<Any>, key: &str, name: &str, price: f64) {
    let product = Product {
        id: None,
        name: name.to_string(),
        price,
        description: None,
        category: "hardware".to_string(),
        rating: Some(4.0),
        supply: Some(100),
    };
    let _: Option<Product> = store
        .create(("product", key))
        .content(product)
        .await
        .unwrap();
}

async fn seed_user(store: &Surreal<Any>, key: &str, role: Role, country: Option<&str>) {
    let user = User {
        id: None,
        name: format!("user {key}"),
        email: format!("{key}@example.com"),
        password_hash: None,
        city: None,
        state: None,
        country: country.map(str::to_string),
        occupation: None,
        phone_number: None,
        role,
    };
    let _: Option<User> = store.create(("user", key)).content(user).await.unwrap();
}

async fn seed_transaction(
    store: &Surreal<Any>,
    key: &str,
    user: &str,
    created_at: &str,
    cost: f64,
    items: &[(&str, i64)],
) {
    let tx = Transaction {
        id: None,
        user: RecordId::from_table_key("user", user),
        products: items
            .iter()
            .map(|(product, quantity)| LineItem {
                product: RecordId::from_table_key("product", *product),
                quantity: *quantity,
            })
            .collect(),
        cost,
        created_at: created_at.to_string(),
    };
    let _: Option<Transaction> = store
        .create(("transaction", key))
        .content(tx)
        .await
        .unwrap();
}

/// Product A sells 10 units across three March transactions and 5 units
/// across two April transactions of the same year; product B never sells.
async fn seed_march_april(store: &Surreal<Any>) {
    seed_product(store, "a", "Widget", 2.0).await;
    seed_product(store, "b", "Gadget", 5.0).await;
    for key in ["u1", "u2", "u3"] {
        seed_user(store, key, Role::User, Some("US")).await;
    }

    seed_transaction(store, "t1", "u1", "2023-03-01T09:00:00Z", 8.0, &[("a", 4)]).await;
    seed_transaction(store, "t2", "u2", "2023-03-10T12:00:00Z", 6.0, &[("a", 3)]).await;
    seed_transaction(store, "t3", "u1", "2023-03-20T15:00:00Z", 6.0, &[("a", 3)]).await;
    seed_transaction(store, "t4", "u3", "2023-04-02T10:00:00Z", 4.0, &[("a", 2)]).await;
    seed_transaction(store, "t5", "u1", "2023-04-15T11:00:00Z", 6.0, &[("a", 3)]).await;
}

#[tokio::test]
async fn rebuild_buckets_product_stats_by_month() {
    let store = test_db().await;
    seed_march_april(&store).await;

    let summary = RollupBuilder::new(store.clone(), 0.05)
        .rebuild_all()
        .await
        .unwrap();
    assert_eq!(summary.transactions_scanned, 5);
    assert_eq!(summary.years, vec![2023]);

    let stat = ProductStatRepository::new(store.clone())
        .find_by_product_year(&RecordId::from_table_key("product", "a"), 2023)
        .await
        .unwrap()
        .expect("product A rollup should exist");

    assert_eq!(stat.monthly_data.len(), 2, "only observed months are stored");
    assert_eq!(stat.monthly_data[0].month, 3);
    assert_eq!(stat.monthly_data[0].units_sold, 10);
    assert_eq!(stat.monthly_data[0].sales_total, 20.0);
    assert_eq!(stat.monthly_data[1].month, 4);
    assert_eq!(stat.monthly_data[1].units_sold, 5);
    assert_eq!(stat.monthly_data[1].sales_total, 10.0);
    assert_eq!(stat.daily_data.len(), 5);

    // Product B never sold: no rollup document for it
    let none = ProductStatRepository::new(store)
        .find_by_product_year(&RecordId::from_table_key("product", "b"), 2023)
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn rebuild_writes_overall_stat_per_year() {
    let store = test_db().await;
    seed_march_april(&store).await;

    RollupBuilder::new(store.clone(), 0.05)
        .rebuild_all()
        .await
        .unwrap();

    let repo = OverallStatRepository::new(store);
    let stat = repo.find_by_year(2023).await.unwrap().expect("2023 rollup");

    assert_eq!(stat.yearly_total_sold_units, 15);
    assert_eq!(stat.yearly_sales_total, 30.0);
    assert_eq!(stat.total_customers, 3, "distinct buyers in 2023");
    assert_eq!(stat.top_products[0].name, "Widget");
    assert_eq!(stat.top_products[0].units_sold, 15);

    // A year with no rebuilt rollup is absent, never a zero-filled document
    assert!(repo.find_by_year(1999).await.unwrap().is_none());
}

#[tokio::test]
async fn rebuild_is_idempotent() {
    let store = test_db().await;
    seed_march_april(&store).await;

    let builder = RollupBuilder::new(store.clone(), 0.05);
    builder.rebuild_all().await.unwrap();

    let snapshot = |store: Surreal<Any>| async move {
        let mut result = store
            .query("SELECT * FROM product_stat ORDER BY id; SELECT * FROM overall_stat ORDER BY id;")
            .await
            .unwrap();
        let product_stats: Vec<serde_json::Value> = result.take(0).unwrap();
        let overall_stats: Vec<serde_json::Value> = result.take(1).unwrap();
        (product_stats, overall_stats)
    };

    let first = snapshot(store.clone()).await;
    builder.rebuild_all().await.unwrap();
    let second = snapshot(store).await;

    assert_eq!(first, second, "unchanged ledger must reproduce identical rollups");
}

#[tokio::test]
async fn rebuild_recomputes_affiliate_totals() {
    let store = test_db().await;
    seed_march_april(&store).await;
    seed_user(&store, "aff", Role::Superadmin, Some("US")).await;

    let affiliate = RecordId::from_table_key("user", "aff");
    let repo = AffiliateStatRepository::new(store.clone());
    repo.create(AffiliateStat {
        id: None,
        user: affiliate.clone(),
        affiliate_sales: vec![AffiliateSale {
            transaction: RecordId::from_table_key("transaction", "t1"),
            amount: 8.0,
        }],
        total_sales_volume: 0.0,
        total_commission: 0.0,
    })
    .await
    .unwrap();

    // Attribution path: a later sale is appended to the existing list
    repo.append_sale(
        &affiliate,
        AffiliateSale {
            transaction: RecordId::from_table_key("transaction", "t4"),
            amount: 4.0,
        },
    )
    .await
    .unwrap();

    RollupBuilder::new(store.clone(), 0.05)
        .rebuild_all()
        .await
        .unwrap();

    let stat = repo
        .find_by_user(&affiliate)
        .await
        .unwrap()
        .expect("affiliate rollup");
    assert_eq!(stat.total_sales_volume, 12.0, "appended sale is included");
    assert_eq!(stat.total_commission, 0.6);
    // The recorded sales list itself is preserved as-is
    assert_eq!(stat.affiliate_sales.len(), 2);
}
