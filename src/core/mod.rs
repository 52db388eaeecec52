pub mod error;
pub mod identity;
pub mod types;

pub use error::{ListError, Result};
pub use identity::{IdentityComparator, loose_eq};
pub use types::{Criteria, SearchResult, TagData, criteria_from_tag_data};
