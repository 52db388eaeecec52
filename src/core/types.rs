use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Query parameters sent to the remote service.
pub type Criteria = Map<String, Value>;

/// Immutable scoping seed fixed at manager construction.
pub type TagData = Value;

/// One page of records returned by a paged search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<T> {
    /// Records of the requested page.
    pub list: Vec<T>,
    /// Total number of matching records regardless of page size.
    pub count: usize,
}

impl<T> SearchResult<T> {
    pub fn new(list: Vec<T>, count: usize) -> Self {
        Self { list, count }
    }
}

impl<T> Default for SearchResult<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            count: 0,
        }
    }
}

/// Builds fresh criteria from tag data.
///
/// Object fields are copied; any other shape (including `None`) yields empty criteria.
pub fn criteria_from_tag_data(tag_data: Option<&TagData>) -> Criteria {
    match tag_data {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Criteria::new(),
    }
}
