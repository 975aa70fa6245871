//! Repository Module
//!
//! Read-mostly data access over the document store. Listing repositories
//! share the [`ListParams`]/[`Page`] pagination contract: the reported total
//! always reflects the filtered population, independent of the pagination
//! window, and sorts are made stable by an `id` tiebreaker.

pub mod affiliate_stat;
pub mod overall_stat;
pub mod product;
pub mod product_stat;
pub mod transaction;
pub mod user;

pub use affiliate_stat::AffiliateStatRepository;
pub use overall_stat::OverallStatRepository;
pub use product::ProductRepository;
pub use product_stat::ProductStatRepository;
pub use transaction::TransactionRepository;
pub use user::UserRepository;

use serde::{Deserialize, Serialize};
use surrealdb::engine::any::Any;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Any>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Any> {
        &self.db
    }
}

// =============================================================================
// Pagination and sorting
// =============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing query parameters (pagination, sort, search)
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Sort field; validated against a per-repository whitelist
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    /// Case-insensitive substring match on name/category-like fields
    #[serde(default)]
    pub search: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            sort_by: None,
            order: SortOrder::default(),
            search: None,
        }
    }
}

impl ListParams {
    /// Page clamped to at least 1
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size clamped to 1..=100
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, 100)
    }

    /// Offset of the first item of the requested page. Widened to `u64`
    /// before multiplying: `page` comes straight from the query string, so
    /// the product can exceed `u32`.
    pub fn start(&self) -> u64 {
        (self.page() as u64 - 1) * self.page_size() as u64
    }

    /// Lowercased search term, if any non-empty one was supplied
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of a filtered, sorted listing
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole filtered population, not of this window
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, params: &ListParams) -> Self {
        let page_size = params.page_size();
        let total_pages = if total > 0 {
            (total + page_size as u64 - 1) / page_size as u64
        } else {
            1
        };
        Self {
            items,
            total,
            page: params.page(),
            page_size,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Build an ORDER BY clause from a whitelisted sort field.
///
/// Field names are interpolated into the query string, so they must come from
/// the static whitelist, never from raw user input. The `id` tiebreaker keeps
/// the sort stable across pagination windows.
pub(crate) fn order_by(params: &ListParams, allowed: &[&str], default: &str) -> RepoResult<String> {
    let field = match params.sort_by.as_deref() {
        Some(requested) => {
            if !allowed.contains(&requested) {
                return Err(RepoError::Validation(format!(
                    "Unsupported sort field: {requested}"
                )));
            }
            requested
        }
        None => default,
    };
    Ok(format!("ORDER BY {field} {}, id ASC", params.order.as_sql()))
}

/// Row shape of `SELECT count() ... GROUP ALL`
#[derive(Debug, Deserialize)]
pub(crate) struct CountRow {
    pub count: u64,
}

/// Parse an id that may or may not carry its table prefix
pub(crate) fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let parsed: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
        if parsed.table() != table {
            return Err(RepoError::Validation(format!(
                "Expected a {table} id, got: {id}"
            )));
        }
        Ok(parsed)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}
