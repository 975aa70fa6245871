//! Product Repository

use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use super::{BaseRepository, CountRow, ListParams, Page, RepoResult, order_by};
use crate::db::models::Product;

const PRODUCT_TABLE: &str = "product";

/// Whitelisted sort fields for product listings
const SORT_FIELDS: &[&str] = &["name", "price", "category", "rating", "supply"];

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paginated, sorted, searched product listing.
    ///
    /// Search matches name or category, case-insensitively.
    pub async fn find_page(&self, params: &ListParams) -> RepoResult<Page<Product>> {
        let search = params.search_term();
        let filter = if search.is_some() {
            "string::contains(string::lowercase(name), $search) \
             OR string::contains(string::lowercase(category), $search)"
        } else {
            "true"
        };

        let order = order_by(params, SORT_FIELDS, "name")?;
        let query = format!(
            "SELECT count() FROM {PRODUCT_TABLE} WHERE {filter} GROUP ALL;\n\
             SELECT * FROM {PRODUCT_TABLE} WHERE {filter} {order} LIMIT $limit START $start;"
        );

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("search", search.unwrap_or_default()))
            .bind(("limit", params.page_size() as i64))
            .bind(("start", params.start() as i64))
            .await?;

        let counts: Vec<CountRow> = result.take(0)?;
        let products: Vec<Product> = result.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page::new(products, total, params))
    }

    /// All products (used by the rollup builder and join steps)
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {PRODUCT_TABLE} ORDER BY name ASC, id ASC"
            ))
            .await?
            .take(0)?;
        Ok(products)
    }
}
