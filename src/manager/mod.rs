//! List managers: a local record list kept in step with a remote service.
//!
//! - [`BaseManager`]: save/remove with remote-first ordering.
//! - [`PaginatedManager`]: paging state machine with a [`Replace`] or [`Union`]
//!   result strategy ([`PagedManager`], [`StackManager`]).
//! - [`FullListManager`]: one unpaged fetch.

mod base;
mod factory;
mod full_list;
mod handle;
mod paginated;
pub mod pagination;

pub use base::BaseManager;
pub use factory::ManagerFactory;
pub use full_list::FullListManager;
pub use handle::ManagerHandle;
pub use paginated::{PagedManager, PaginatedManager, Replace, ResultStrategy, StackManager, Union};
pub use pagination::{PaginationState, PagingPolicy, RowsChangePolicy, page_count_for};
