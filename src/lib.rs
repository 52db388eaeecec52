// ============================================================================
// listsync Library
// ============================================================================

//! Client-side list managers that keep an ordered, identity-aware snapshot of
//! remote records in sync with a record service.
//!
//! # Examples
//!
//! ```
//! use listsync::{InMemoryRecordService, ManagerFactory, ManagerConfig, ManagerOptions};
//! use serde_json::{Value, json};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> listsync::Result<()> {
//! let service = Arc::new(InMemoryRecordService::new("id"));
//! service.seed((0..52).map(|i| json!({"title": format!("task {i}")})).collect()).await;
//!
//! let factory = ManagerFactory::new(ManagerConfig::new().rows_per_page(25))?;
//! let mut tasks = factory.paged::<Value, _>(service, "id", ManagerOptions::new());
//! tasks.initialize().await?;
//! assert_eq!(tasks.page_count(), 3);
//!
//! tasks.set_page_no(5).await?;
//! assert_eq!(tasks.page_no(), 3);
//! assert_eq!(tasks.list().len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod manager;
pub mod service;

// Re-export main types for convenience
pub use cache::LocalListCache;
pub use config::{ConvertFn, ManagerConfig, ManagerOptions};
pub use core::{Criteria, IdentityComparator, ListError, Result, SearchResult, TagData};
pub use manager::{
    BaseManager, FullListManager, ManagerFactory, ManagerHandle, PagedManager, PaginatedManager,
    PaginationState, PagingPolicy, Replace, ResultStrategy, RowsChangePolicy, StackManager, Union,
};
pub use service::{FullListService, InMemoryRecordService, PagingService, RecordService};
