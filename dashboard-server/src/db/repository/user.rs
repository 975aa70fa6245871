//! User Repository

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use super::{BaseRepository, CountRow, ListParams, Page, RepoResult, order_by, parse_record_id};
use crate::db::models::{Role, User};

const USER_TABLE: &str = "user";

/// Whitelisted sort fields for user listings
const SORT_FIELDS: &[&str] = &["name", "email", "country", "occupation", "phone_number"];

/// Raw per-country customer count as returned by the store
#[derive(Debug, Clone, Deserialize)]
pub struct CountryCount {
    pub country: String,
    pub count: u64,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Any>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paginated, sorted, searched listing of users with the given role.
    ///
    /// Search matches name or email, case-insensitively.
    pub async fn find_page(&self, role: Role, params: &ListParams) -> RepoResult<Page<User>> {
        let mut filter = String::from("role = $role");
        let search = params.search_term();
        if search.is_some() {
            filter.push_str(
                " AND (string::contains(string::lowercase(name), $search) \
                 OR string::contains(string::lowercase(email), $search))",
            );
        }

        let order = order_by(params, SORT_FIELDS, "name")?;
        let query = format!(
            "SELECT count() FROM {USER_TABLE} WHERE {filter} GROUP ALL;\n\
             SELECT * FROM {USER_TABLE} WHERE {filter} {order} LIMIT $limit START $start;"
        );

        let mut result = self
            .base
            .db()
            .query(query)
            .bind(("role", role))
            .bind(("search", search.unwrap_or_default()))
            .bind(("limit", params.page_size() as i64))
            .bind(("start", params.start() as i64))
            .await?;

        let counts: Vec<CountRow> = result.take(0)?;
        let users: Vec<User> = result.take(1)?;
        let total = counts.first().map(|c| c.count).unwrap_or(0);

        Ok(Page::new(users, total, params))
    }

    /// All users with the given role (unpaginated; used by the affiliate
    /// performance aggregation)
    pub async fn find_all_by_role(&self, role: Role) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query(format!(
                "SELECT * FROM {USER_TABLE} WHERE role = $role ORDER BY name ASC, id ASC"
            ))
            .bind(("role", role))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Customers per country, grouped store-side.
    ///
    /// Users without a country are excluded here rather than surfaced as an
    /// error or an empty-string bucket; every user with a non-empty country
    /// is counted exactly once.
    pub async fn geography(&self) -> RepoResult<Vec<CountryCount>> {
        let counts: Vec<CountryCount> = self
            .base
            .db()
            .query(format!(
                "SELECT country, count() AS count FROM {USER_TABLE} \
                 WHERE role = $role AND string::len(country OR '') > 0 \
                 GROUP BY country"
            ))
            .bind(("role", Role::User))
            .await?
            .take(0)?;
        Ok(counts)
    }
}
