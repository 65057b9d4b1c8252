use std::str::FromStr;

use async_trait::async_trait;
use greek_tax_core::db::repository::{RepositoryError, TaxRepository};
use greek_tax_core::db::{DbConfig, RepositoryFactory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::repository::SqliteRepository;

/// Normalizes a connection string to a sqlx URL.
///
/// Bare paths and `:memory:` are accepted alongside `sqlite:` URLs.
fn to_url(connection_string: &str) -> String {
    if connection_string.starts_with("sqlite:") {
        connection_string.to_string()
    } else {
        format!("sqlite:{}", connection_string)
    }
}

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`greek_tax_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use greek_tax_core::db::RepositoryRegistry;
/// use greek_tax_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database described by `config.connection_string`, creating
    /// the file if needed, and brings its schema up to date.
    ///
    /// Seed data is not loaded here; the loader binary does that on request.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxRepository>, RepositoryError> {
        let url = to_url(&config.connection_string);
        let options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| RepositoryError::Configuration(e.to_string()))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(database = %url, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}
