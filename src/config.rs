use crate::core::{ListError, Result, TagData};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_ROWS_PER_PAGE: usize = 25;
pub const DEFAULT_PAGE_NO_KEY: &str = "page";
pub const DEFAULT_ROWS_KEY: &str = "rows";

/// Paging configuration applied to every manager built with it.
///
/// Typically created once at startup and handed to a
/// [`ManagerFactory`](crate::ManagerFactory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Rows requested per page until a manager changes it
    pub rows_per_page: usize,

    /// Criteria key carrying the page number
    pub page_no_key: String,

    /// Criteria key carrying the page size
    pub rows_key: String,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            page_no_key: DEFAULT_PAGE_NO_KEY.to_string(),
            rows_key: DEFAULT_ROWS_KEY.to_string(),
        }
    }
}

impl ManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default page size
    pub fn rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows;
        self
    }

    /// Set the criteria key used for the page number
    pub fn page_no_key(mut self, key: &str) -> Self {
        self.page_no_key = key.to_string();
        self
    }

    /// Set the criteria key used for the page size
    pub fn rows_key(mut self, key: &str) -> Self {
        self.rows_key = key.to_string();
        self
    }

    /// Parse from JSON, filling absent fields with defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use listsync::ManagerConfig;
    ///
    /// let config = ManagerConfig::from_json(r#"{"rows_per_page": 50}"#).unwrap();
    /// assert_eq!(config.rows_per_page, 50);
    /// assert_eq!(config.page_no_key, "page");
    /// ```
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.rows_per_page == 0 {
            return Err(ListError::InvalidConfig(
                "rows_per_page must be > 0".to_string(),
            ));
        }

        if self.page_no_key.is_empty() || self.rows_key.is_empty() {
            return Err(ListError::InvalidConfig(
                "paging keys cannot be empty".to_string(),
            ));
        }

        if self.page_no_key == self.rows_key {
            return Err(ListError::InvalidConfig(format!(
                "page_no_key and rows_key must differ (both '{}')",
                self.rows_key
            )));
        }

        Ok(())
    }
}

/// Post-save normalisation hook: `(saved record, is_new) -> local record`.
pub type ConvertFn<T> = Arc<dyn Fn(T, bool) -> T + Send + Sync>;

/// Per-manager options fixed at construction.
pub struct ManagerOptions<T> {
    pub convert: Option<ConvertFn<T>>,
    /// Insert newly created records at the head (true) or the tail (false).
    pub from_top: bool,
    pub tag_data: Option<TagData>,
}

impl<T> Default for ManagerOptions<T> {
    fn default() -> Self {
        Self {
            convert: None,
            from_top: true,
            tag_data: None,
        }
    }
}

impl<T> Clone for ManagerOptions<T> {
    fn clone(&self) -> Self {
        Self {
            convert: self.convert.clone(),
            from_top: self.from_top,
            tag_data: self.tag_data.clone(),
        }
    }
}

impl<T> fmt::Debug for ManagerOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerOptions")
            .field("convert", &self.convert.as_ref().map(|_| "<fn>"))
            .field("from_top", &self.from_top)
            .field("tag_data", &self.tag_data)
            .finish()
    }
}

impl<T> ManagerOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert<F>(mut self, convert: F) -> Self
    where
        F: Fn(T, bool) -> T + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(convert));
        self
    }

    pub fn from_top(mut self, from_top: bool) -> Self {
        self.from_top = from_top;
        self
    }

    pub fn tag_data(mut self, tag_data: TagData) -> Self {
        self.tag_data = Some(tag_data);
        self
    }
}
