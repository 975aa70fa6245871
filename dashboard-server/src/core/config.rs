//! Server configuration
//!
//! All configuration comes from environment variables:
//!
//! | Environment variable | Default | Notes |
//! |----------------------|---------|-------|
//! | DATABASE_URL | (required) | store connection string, e.g. `rocksdb://./data` or `ws://host:8000` |
//! | DATABASE_NS | dashboard | SurrealDB namespace |
//! | DATABASE_DB | dashboard | SurrealDB database |
//! | HTTP_PORT | 8080 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | ALLOWED_ORIGINS | * | comma-separated CORS origins |
//! | COMMISSION_RATE | 0.05 | affiliate commission rate applied by the rollup job |
//!
//! A missing `DATABASE_URL` is a fatal startup error: the process must exit
//! rather than serve with a broken store dependency.

use crate::utils::AppError;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Store connection string (engine selected by scheme)
    pub database_url: String,
    /// SurrealDB namespace
    pub namespace: String,
    /// SurrealDB database
    pub database: String,
    /// HTTP API port
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Allowed CORS origins ("*" means any)
    pub allowed_origins: Vec<String>,
    /// Commission rate used when deriving affiliate totals
    pub commission_rate: f64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails when a required variable is missing or unparseable.
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            AppError::Config("Missing required environment variable: DATABASE_URL".into())
        })?;

        let http_port = match std::env::var("HTTP_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid HTTP_PORT: {raw}")))?,
            Err(_) => 8080,
        };

        let commission_rate = match std::env::var("COMMISSION_RATE") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid COMMISSION_RATE: {raw}")))?,
            Err(_) => 0.05,
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            database_url,
            namespace: std::env::var("DATABASE_NS").unwrap_or_else(|_| "dashboard".into()),
            database: std::env::var("DATABASE_DB").unwrap_or_else(|_| "dashboard".into()),
            http_port,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            allowed_origins,
            commission_rate,
        })
    }

    /// Whether CORS should allow any origin
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
