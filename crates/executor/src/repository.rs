//! Repositories and repository providers
//!
//! A [`Repository`] ties one contract to one collection: it saves models
//! and hands out fresh builders. A [`RepositoryProvider`] resolves the
//! collection named by a [`RepositoryConfig`] and produces repositories.

use std::marker::PhantomData;
use std::sync::Arc;

use quarry_storage::{CollectionRegistry, DocumentStore};
use tracing::debug;

use crate::builder::{BuilderFactory, Contract};
use crate::output::encode;
use crate::registry::ConventionRegistry;
use crate::{Error, RepositoryConfig, Result};

/// Connection string scheme served by [`MemoryRepositoryProvider`]
pub const MEMORY_SCHEME: &str = "memory://";

/// Saves models of one contract and produces its builders
pub struct Repository<C> {
    store: Arc<dyn DocumentStore>,
    config: Arc<RepositoryConfig>,
    registry: Arc<ConventionRegistry>,
    _contract: PhantomData<fn() -> C>,
}

impl<C: Contract> Repository<C> {
    /// Create a repository over `store`
    pub fn new(
        store: Arc<dyn DocumentStore>,
        config: RepositoryConfig,
        registry: Arc<ConventionRegistry>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            registry,
            _contract: PhantomData,
        }
    }

    /// The backing collection
    pub fn collection(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// The repository configuration
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Insert or replace `model`; returns the store's acknowledgement
    pub fn save(&self, model: &C::Model) -> Result<bool> {
        let document = encode(model)?;
        Ok(self.store.save(document, self.config.write_concern)?.ok)
    }

    /// A new builder with an empty session
    pub fn builder(&self) -> Result<C> {
        BuilderFactory::create::<C>(
            &self.registry,
            Arc::clone(&self.store),
            Arc::clone(&self.config),
        )
    }
}

impl<C> Clone for Repository<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
            registry: Arc::clone(&self.registry),
            _contract: PhantomData,
        }
    }
}

impl<C> std::fmt::Debug for Repository<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("collection", &self.store.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Produces repositories from configuration
pub trait RepositoryProvider {
    /// Resolve the configured collection and build a repository for `C`
    ///
    /// `C` must be resolvable by `registry`; an unregistered contract fails
    /// here with [`Error::NotRegistered`] rather than on its first call.
    fn create_repository<C: Contract>(
        &self,
        config: RepositoryConfig,
        registry: Arc<ConventionRegistry>,
    ) -> Result<Repository<C>>;
}

/// Provider backed by in-process collections
///
/// Accepts only `memory://` connection strings. Repositories created with
/// the same database and collection names share one collection.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepositoryProvider {
    collections: Arc<CollectionRegistry>,
}

impl MemoryRepositoryProvider {
    /// Provider with its own empty set of collections
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider over an existing set of collections
    pub fn with_collections(collections: Arc<CollectionRegistry>) -> Self {
        Self { collections }
    }

    /// The collections this provider serves
    pub fn collections(&self) -> &Arc<CollectionRegistry> {
        &self.collections
    }
}

impl RepositoryProvider for MemoryRepositoryProvider {
    fn create_repository<C: Contract>(
        &self,
        config: RepositoryConfig,
        registry: Arc<ConventionRegistry>,
    ) -> Result<Repository<C>> {
        if !config.connection_string.starts_with(MEMORY_SCHEME) {
            return Err(Error::Config {
                reason: format!(
                    "unsupported connection string {:?}, expected {}",
                    config.connection_string, MEMORY_SCHEME
                ),
            });
        }

        registry.resolve::<C>()?;

        let store: Arc<dyn DocumentStore> =
            self.collections.collection(&config.database, &config.collection);
        debug!(
            target: "quarry::executor",
            contract = C::NAME,
            database = %config.database,
            collection = %config.collection,
            "Created repository"
        );
        Ok(Repository::new(store, config, registry))
    }
}
