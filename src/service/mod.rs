//! Remote record-service contract consumed by the managers.
//!
//! Transport, serialization and authentication live behind these traits; the
//! managers only await their results. Errors are returned as
//! [`ListError::Remote`](crate::ListError::Remote) and propagated untouched.

mod in_memory;

use crate::core::{Criteria, ListError, Result, SearchResult, TagData, criteria_from_tag_data};
use async_trait::async_trait;

pub use in_memory::InMemoryRecordService;

/// Persistence operations shared by every manager kind.
#[async_trait]
pub trait RecordService<T: Send + Sync + 'static>: Send + Sync {
    /// Persists a record and returns the canonical server representation.
    async fn save(&self, data: T, is_new: bool) -> Result<T>;

    /// Deletes a record by its identity.
    async fn remove(&self, item: &T) -> Result<()>;
}

/// Paged query support used by the paginated managers.
#[async_trait]
pub trait PagingService<T: Send + Sync + 'static>: RecordService<T> {
    /// Runs a query. `count` in the result is the total match count, not the page size.
    async fn search(&self, criteria: &Criteria) -> Result<SearchResult<T>>;

    /// Seed criteria for a tag/filter scope.
    fn build_criteria(&self, tag_data: Option<&TagData>) -> Criteria {
        criteria_from_tag_data(tag_data)
    }

    /// Blank record for "create new" flows.
    async fn build_new_entry(&self, _tag_data: Option<&TagData>) -> Result<T> {
        Err(ListError::Unsupported(
            "service does not build new entries".to_string(),
        ))
    }
}

/// Unpaged full-set fetch.
#[async_trait]
pub trait FullListService<T: Send + Sync + 'static>: RecordService<T> {
    async fn get_list(&self, params: Option<&TagData>) -> Result<Vec<T>>;
}
