use super::full_list::FullListManager;
use super::pagination::PagingPolicy;
use super::paginated::{PagedManager, PaginatedManager, ResultStrategy, StackManager};
use crate::config::{ManagerConfig, ManagerOptions};
use crate::core::{IdentityComparator, Result};
use crate::service::{FullListService, PagingService};
use std::sync::Arc;

/// Builds managers that share one paging configuration.
///
/// Configure it once at startup; every manager created afterwards picks up the
/// same default page size and criteria keys.
#[derive(Debug, Clone, Default)]
pub struct ManagerFactory {
    config: ManagerConfig,
}

impl ManagerFactory {
    pub fn new(config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn paged<T, S>(
        &self,
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> PagedManager<T, S>
    where
        T: Clone + Send + Sync + 'static,
        S: PagingService<T> + ?Sized,
    {
        PaginatedManager::build(service, identity.into(), options, &self.config)
    }

    pub fn stack<T, S>(
        &self,
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> StackManager<T, S>
    where
        T: Clone + Send + Sync + 'static,
        S: PagingService<T> + ?Sized,
    {
        PaginatedManager::build(service, identity.into(), options, &self.config)
    }

    /// Any result strategy with an explicit policy.
    pub fn paginated<T, S, R>(
        &self,
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
        policy: PagingPolicy,
    ) -> PaginatedManager<T, S, R>
    where
        T: Clone + Send + Sync + 'static,
        S: PagingService<T> + ?Sized,
        R: ResultStrategy,
    {
        PaginatedManager::build(service, identity.into(), options, &self.config).with_policy(policy)
    }

    pub fn full_list<T, S>(
        &self,
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> FullListManager<T, S>
    where
        T: Clone + Send + Sync + 'static,
        S: FullListService<T> + ?Sized,
    {
        FullListManager::new(service, identity, options)
    }
}
