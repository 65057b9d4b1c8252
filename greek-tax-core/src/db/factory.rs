use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use super::repository::{RepositoryError, TaxRepository};

/// Which storage backend to open and how to reach it.
///
/// `backend` selects a registered [`RepositoryFactory`] by name; the
/// `connection_string` is handed to that factory untouched.
///
/// | backend  | connection_string examples                  |
/// |----------|---------------------------------------------|
/// | `sqlite` | `greek-tax.db`, `sqlite:tax.db?mode=rwc`, `:memory:` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        }
    }
}

/// Opens repositories for one backend.
///
/// Backend crates export a unit struct implementing this trait; binaries
/// register it with a [`RepositoryRegistry`] at startup.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Lowercase name matched against [`DbConfig::backend`].
    fn backend_name(&self) -> &'static str;

    /// Connects and returns a repository whose schema is up to date.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxRepository>, RepositoryError>;
}

/// Backend factories by name.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory, replacing any previous one with the same name.
    pub fn register(
        &mut self,
        factory: Box<dyn RepositoryFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository through the factory named by `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] for an unregistered backend, or
    /// whatever the factory itself returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxRepository>, RepositoryError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        debug!(backend = %config.backend, "opening repository");
        factory.create(config).await
    }
}
