//! Live aggregation and listing integration tests against an in-memory store
//! Run: cargo test -p dashboard-server --test aggregation

use std::collections::BTreeSet;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use dashboard_server::api::sales::handler::{OverallStatsQuery, overall_stats};
use dashboard_server::core::{Config, ServerState};
use dashboard_server::db;
use dashboard_server::db::models::{
    AffiliateSale, AffiliateStat, LineItem, Product, Role, Transaction, User,
};
use dashboard_server::db::repository::{
    AffiliateStatRepository, ListParams, ProductRepository, SortOrder, UserRepository,
};
use dashboard_server::stats::affiliate_performance;
use surrealdb::engine::any::{self, Any};
use surrealdb::{RecordId, Surreal};

async fn test_db() -> Surreal<Any> {
    let store = any::connect("mem://").await.unwrap();
    store.use_ns("test").use_db("test").await.unwrap();
    db::define_indexes(&store).await.unwrap();
    store
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

async fn seed_product(store: &Surreal<Any>, key: &str, name: &str, price: f64) {
    let product = Product {
        id: None,
        name: name.to_string(),
        price,
        description: None,
        category: "hardware".to_string(),
        rating: None,
        supply: None,
    };
    let _: Option<Product> = store
        .create(("product", key))
        .content(product)
        .await
        .unwrap();
}

#[tokio::test]
async fn geography_counts_customers_with_known_country_once() {
    let store = test_db().await;
    seed_user(&store, "u1", Role::User, Some("US")).await;
    seed_user(&store, "u2", Role::User, Some("US")).await;
    seed_user(&store, "u3", Role::User, Some("DE")).await;
    seed_user(&store, "u4", Role::User, None).await;
    seed_user(&store, "a1", Role::Admin, Some("FR")).await;

    let mut counts = UserRepository::new(store).geography().await.unwrap();
    counts.sort_by(|a, b| a.country.cmp(&b.country));

    assert_eq!(counts.len(), 2, "unknown-country and admin users excluded");
    assert_eq!((counts[0].country.as_str(), counts[0].count), ("DE", 1));
    assert_eq!((counts[1].country.as_str(), counts[1].count), ("US", 2));

    let total: u64 = counts.iter().map(|c| c.count).sum();
    assert_eq!(total, 3);
}

#[tokio::test]
async fn customer_listing_excludes_admins_and_reports_filtered_total() {
    let store = test_db().await;
    for key in ["u1", "u2", "u3"] {
        seed_user(&store, key, Role::User, Some("US")).await;
    }
    seed_user(&store, "a1", Role::Admin, Some("US")).await;

    let repo = UserRepository::new(store);
    let page = repo
        .find_page(Role::User, &ListParams::default())
        .await
        .unwrap();

    assert_eq!(page.total, 3);
    assert!(page.items.iter().all(|u| u.is_customer()));

    // Search narrows both the window and the reported total
    let params = ListParams {
        search: Some("u2@".to_string()),
        ..ListParams::default()
    };
    let filtered = repo.find_page(Role::User, &params).await.unwrap();
    assert_eq!(filtered.total, 1);
    assert_eq!(filtered.items[0].email, "u2@example.com");
}

#[tokio::test]
async fn pagination_walks_the_population_exactly_once() {
    let store = test_db().await;
    for i in 1..=7 {
        seed_product(&store, &format!("p{i}"), &format!("product {i:02}"), i as f64).await;
    }

    let repo = ProductRepository::new(store);
    let mut seen = Vec::new();
    for page_no in 1..=3 {
        let params = ListParams {
            page: page_no,
            page_size: 3,
            sort_by: Some("name".to_string()),
            order: SortOrder::Asc,
            search: None,
        };
        let page = repo.find_page(&params).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
        seen.extend(page.items.into_iter().map(|p| p.name));
    }

    assert_eq!(seen.len(), 7, "no item duplicated across windows");
    let distinct: BTreeSet<&String> = seen.iter().collect();
    assert_eq!(distinct.len(), 7, "no item dropped across windows");
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(seen, sorted, "windows follow the global sort order");
}

#[tokio::test]
async fn unsupported_sort_field_is_rejected() {
    let store = test_db().await;
    let params = ListParams {
        sort_by: Some("password_hash".to_string()),
        ..ListParams::default()
    };
    let err = UserRepository::new(store)
        .find_page(Role::User, &params)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Unsupported sort field"));
}

#[tokio::test]
async fn overall_stats_without_rollup_responds_404_with_no_data_code() {
    let store = test_db().await;
    let config = Config {
        database_url: "mem://".to_string(),
        namespace: "test".to_string(),
        database: "test".to_string(),
        http_port: 8080,
        environment: "test".to_string(),
        allowed_origins: vec!["*".to_string()],
        commission_rate: 0.05,
    };
    let state = ServerState::new(config, store);

    let err = overall_stats(State(state), Query(OverallStatsQuery { year: Some(1999) }))
        .await
        .expect_err("a year with no rollup must not yield a payload");

    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "E1404");
    assert!(body["message"].as_str().unwrap().contains("1999"));
}

#[tokio::test]
async fn performance_skips_pruned_ledger_references() {
    let store = test_db().await;
    seed_user(&store, "aff", Role::Superadmin, Some("US")).await;
    seed_user(&store, "u1", Role::User, Some("US")).await;
    seed_product(&store, "a", "Widget", 2.0).await;

    let tx = Transaction {
        id: None,
        user: RecordId::from_table_key("user", "u1"),
        products: vec![LineItem {
            product: RecordId::from_table_key("product", "a"),
            quantity: 2,
        }],
        cost: 100.0,
        created_at: "2023-03-01T09:00:00Z".to_string(),
    };
    let _: Option<Transaction> = store.create(("transaction", "t1")).content(tx).await.unwrap();

    AffiliateStatRepository::new(store.clone())
        .create(AffiliateStat {
            id: None,
            user: RecordId::from_table_key("user", "aff"),
            affiliate_sales: vec![
                AffiliateSale {
                    transaction: RecordId::from_table_key("transaction", "t1"),
                    amount: 100.0,
                },
                AffiliateSale {
                    transaction: RecordId::from_table_key("transaction", "gone"),
                    amount: 50.0,
                },
            ],
            total_sales_volume: 150.0,
            total_commission: 7.5,
        })
        .await
        .unwrap();

    let performances = affiliate_performance(store).await.unwrap();
    assert_eq!(performances.len(), 1);

    let perf = &performances[0];
    assert_eq!(perf.total_sales_volume, 150.0, "stored totals pass through");
    assert_eq!(perf.resolved_volume, 100.0);
    assert_eq!(perf.skipped_references, 1);
    assert_eq!(perf.sales.len(), 1);
    assert_eq!(perf.sales[0].items[0].name, "Widget");
    assert_eq!(perf.sales[0].items[0].quantity, 2);
}

#[tokio::test]
async fn affiliates_without_stats_still_appear_ranked_last() {
    let store = test_db().await;
    seed_user(&store, "aff1", Role::Superadmin, Some("US")).await;
    seed_user(&store, "aff2", Role::Superadmin, Some("DE")).await;

    AffiliateStatRepository::new(store.clone())
        .create(AffiliateStat {
            id: None,
            user: RecordId::from_table_key("user", "aff2"),
            affiliate_sales: Vec::new(),
            total_sales_volume: 42.0,
            total_commission: 2.1,
        })
        .await
        .unwrap();

    let performances = affiliate_performance(store).await.unwrap();
    assert_eq!(performances.len(), 2);
    assert_eq!(performances[0].total_sales_volume, 42.0);
    assert_eq!(performances[1].total_sales_volume, 0.0);
    assert!(performances[1].sales.is_empty());
}
