use super::base::BaseManager;
use super::pagination::{
    PaginationState, PagingPolicy, RowsChangePolicy, page_count_for, preserved_page_no,
};
use crate::cache::LocalListCache;
use crate::config::{ManagerConfig, ManagerOptions};
use crate::core::{Criteria, IdentityComparator, ListError, Result, SearchResult};
use crate::service::PagingService;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tracing::{debug, warn};

/// How a fetched page is folded into the local list.
pub trait ResultStrategy: Send + Sync + 'static {
    /// Page-size policy used when none is given explicitly.
    const DEFAULT_ROWS_CHANGE: RowsChangePolicy;

    fn apply<T: Clone>(cache: &mut LocalListCache<T>, page: Vec<T>);
}

/// Each page overwrites the visible list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Replace;

/// Each page is merged into the visible list by identity ("load more").
#[derive(Debug, Clone, Copy, Default)]
pub struct Union;

impl ResultStrategy for Replace {
    const DEFAULT_ROWS_CHANGE: RowsChangePolicy = RowsChangePolicy::ResetToFirst;

    fn apply<T: Clone>(cache: &mut LocalListCache<T>, page: Vec<T>) {
        cache.replace_all(page);
    }
}

impl ResultStrategy for Union {
    const DEFAULT_ROWS_CHANGE: RowsChangePolicy = RowsChangePolicy::PreservePosition;

    fn apply<T: Clone>(cache: &mut LocalListCache<T>, page: Vec<T>) {
        cache.union_by_identity(page);
    }
}

/// A [`BaseManager`] driven by a pagination state machine.
///
/// The result strategy `R` decides whether a page replaces the list ([`Replace`])
/// or accumulates into it ([`Union`]). Page-size and post-remove behaviour come
/// from the [`PagingPolicy`] chosen at construction.
///
/// # Examples
///
/// ```
/// use listsync::{InMemoryRecordService, ManagerOptions, StackManager};
/// use serde_json::{Value, json};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> listsync::Result<()> {
/// let service = Arc::new(InMemoryRecordService::new("id"));
/// service.seed((0..30).map(|i| json!({"n": i})).collect()).await;
///
/// let mut manager: StackManager<Value, _> =
///     StackManager::new(service, "id", ManagerOptions::new());
/// manager.set_rows_per_page(10).await?;
/// while manager.has_more() {
///     manager.load_more().await?;
/// }
/// assert_eq!(manager.len(), 30);
/// # Ok(())
/// # }
/// ```
pub struct PaginatedManager<T, S: ?Sized, R> {
    base: BaseManager<T, S>,
    state: PaginationState,
    policy: PagingPolicy,
    page_no_key: String,
    rows_key: String,
    _strategy: PhantomData<fn() -> R>,
}

/// Replace-mode paging: the list always shows exactly one page.
pub type PagedManager<T, S> = PaginatedManager<T, S, Replace>;

/// Accumulate-mode paging: pages stack up as they are loaded.
pub type StackManager<T, S> = PaginatedManager<T, S, Union>;

impl<T, S, R> PaginatedManager<T, S, R>
where
    T: Clone + Send + Sync + 'static,
    S: PagingService<T> + ?Sized,
    R: ResultStrategy,
{
    /// Builds a manager with the default [`ManagerConfig`].
    pub fn new(
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
    ) -> Self {
        Self::build(service, identity.into(), options, &ManagerConfig::default())
    }

    /// Builds a manager with explicit paging configuration.
    pub fn with_config(
        service: Arc<S>,
        identity: impl Into<IdentityComparator<T>>,
        options: ManagerOptions<T>,
        config: &ManagerConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(service, identity.into(), options, config))
    }

    pub(crate) fn build(
        service: Arc<S>,
        identity: IdentityComparator<T>,
        options: ManagerOptions<T>,
        config: &ManagerConfig,
    ) -> Self {
        let criteria = service.build_criteria(options.tag_data.as_ref());
        Self {
            base: BaseManager::new(service, identity, options),
            state: PaginationState::new(criteria, config.rows_per_page),
            policy: PagingPolicy::new(R::DEFAULT_ROWS_CHANGE),
            page_no_key: config.page_no_key.clone(),
            rows_key: config.rows_key.clone(),
            _strategy: PhantomData,
        }
    }

    /// Replaces the paging policy. Meant to be chained right after construction.
    pub fn with_policy(mut self, policy: PagingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PagingPolicy {
        self.policy
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.state
    }

    pub fn page_no(&self) -> usize {
        self.state.page_no()
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count()
    }

    pub fn rows_per_page(&self) -> usize {
        self.state.rows_per_page()
    }

    /// Total records matching the current criteria.
    pub fn count(&self) -> usize {
        self.state.count()
    }

    /// Criteria last sent to the service, paging keys included.
    pub fn criteria(&self) -> &Criteria {
        self.state.criteria()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    /// First fetch, using criteria built from the tag data.
    pub async fn initialize(&mut self) -> Result<()> {
        self.reset_search().await
    }

    /// Replaces the criteria and fetches page 1.
    pub async fn search(&mut self, criteria: Criteria) -> Result<()> {
        let rows = self.state.rows_per_page();
        self.search_data(criteria, 1, rows).await
    }

    #[deprecated(note = "use `search`")]
    pub async fn set_criteria(&mut self, criteria: Criteria) -> Result<()> {
        self.search(criteria).await
    }

    /// Drops filter refinements, keeping only the tag-data scope, and fetches page 1.
    pub async fn reset_search(&mut self) -> Result<()> {
        let criteria = self.base.service().build_criteria(self.base.tag_data());
        self.search(criteria).await
    }

    /// Re-fetches the current page with the current criteria.
    pub async fn refresh(&mut self) -> Result<()> {
        let criteria = self.state.criteria().clone();
        let page_no = self.state.page_no() as i64;
        let rows = self.state.rows_per_page();
        self.search_data(criteria, page_no, rows).await
    }

    /// Fetches page `page_no`, clamped into `[1, page_count]`.
    pub async fn set_page_no(&mut self, page_no: i64) -> Result<()> {
        let criteria = self.state.criteria().clone();
        let rows = self.state.rows_per_page();
        self.search_data(criteria, page_no, rows).await
    }

    /// Changes the page size and re-fetches according to the rows-change policy.
    pub async fn set_rows_per_page(&mut self, rows: usize) -> Result<()> {
        if rows == 0 {
            return Err(ListError::InvalidArgument(
                "rows per page must be > 0".to_string(),
            ));
        }
        let page_no = match self.policy.rows_change {
            RowsChangePolicy::ResetToFirst => 1,
            RowsChangePolicy::PreservePosition => {
                preserved_page_no(self.state.page_no(), self.state.rows_per_page(), rows)
            }
        };
        let criteria = self.state.criteria().clone();
        self.search_data(criteria, page_no as i64, rows).await
    }

    /// Fetches the next page. Returns false without calling the service when the
    /// last page is already loaded.
    pub async fn load_more(&mut self) -> Result<bool> {
        if !self.state.has_more() {
            return Ok(false);
        }
        self.set_page_no(self.state.page_no() as i64 + 1).await?;
        Ok(true)
    }

    /// Deletes `item` remotely and locally; with a backfilling policy, refreshes the
    /// page once fewer than half a page of records remains.
    pub async fn remove(&mut self, item: &T) -> Result<()> {
        self.base.remove(item).await?;
        if self.policy.refresh_below_half && self.base.len() * 2 < self.state.rows_per_page() {
            debug!(
                len = self.base.len(),
                rows = self.state.rows_per_page(),
                "list below half a page, refreshing"
            );
            self.refresh().await?;
        }
        Ok(())
    }

    /// Asks the service for a blank record scoped by the tag data.
    pub async fn create_new_entry(&self) -> Result<T> {
        self.base
            .service()
            .build_new_entry(self.base.tag_data())
            .await
    }

    async fn search_data(&mut self, criteria: Criteria, requested: i64, rows: usize) -> Result<()> {
        let mut page_no = self.state.clamp_page_for(requested, rows);
        let (mut request, mut result) = self.fetch_page(&criteria, page_no, rows).await?;

        // The total may have shrunk under us; show the last page that still exists.
        let last_page = page_count_for(result.count, rows);
        if page_no > last_page {
            debug!(
                page_no,
                last_page,
                count = result.count,
                "requested page vanished, refetching"
            );
            page_no = last_page;
            (request, result) = self.fetch_page(&criteria, page_no, rows).await?;
        }

        let count = result.count;
        let received = result.list.len();
        R::apply(self.base.cache_mut(), result.list);
        self.state.commit(request, page_no, rows, count);
        debug!(
            page_no = self.state.page_no(),
            page_count = self.state.page_count(),
            rows,
            count,
            received,
            len = self.base.len(),
            "page loaded"
        );
        Ok(())
    }

    async fn fetch_page(
        &self,
        criteria: &Criteria,
        page_no: usize,
        rows: usize,
    ) -> Result<(Criteria, SearchResult<T>)> {
        let request = PaginationState::paged_request(
            criteria,
            &self.page_no_key,
            page_no,
            &self.rows_key,
            rows,
        );
        match self.base.service().search(&request).await {
            Ok(result) => Ok((request, result)),
            Err(err) => {
                warn!(page_no, rows, error = %err, "remote search failed");
                Err(err)
            }
        }
    }
}

impl<T, S: ?Sized, R> Deref for PaginatedManager<T, S, R> {
    type Target = BaseManager<T, S>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<T, S: ?Sized, R> DerefMut for PaginatedManager<T, S, R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.base
    }
}
