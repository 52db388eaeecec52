//! Pagination bookkeeping shared by the paged and stacked managers.

use crate::core::Criteria;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of pages needed for `total` records, never less than one.
pub fn page_count_for(total: usize, rows_per_page: usize) -> usize {
    total.div_ceil(rows_per_page.max(1)).max(1)
}

/// Page that keeps the first record of `page_no` visible after a page-size change.
///
/// `floor((page_no - 1) / (new_rows / old_rows)) + 1`
pub fn preserved_page_no(page_no: usize, old_rows: usize, new_rows: usize) -> usize {
    let ratio = new_rows.max(1) as f64 / old_rows.max(1) as f64;
    ((page_no.max(1) - 1) as f64 / ratio).floor() as usize + 1
}

/// How a page-size change picks the page to fetch next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowsChangePolicy {
    /// Start again from the first page.
    ResetToFirst,
    /// Stay on the page that contains the current position.
    PreservePosition,
}

/// Behavioural switches of a paginated manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingPolicy {
    pub rows_change: RowsChangePolicy,
    /// After a remove, refresh the current page when fewer than half a page remains.
    pub refresh_below_half: bool,
}

impl PagingPolicy {
    pub const fn new(rows_change: RowsChangePolicy) -> Self {
        Self {
            rows_change,
            refresh_below_half: false,
        }
    }

    /// Policy for lists that must stay visually full: position-preserving page size
    /// changes plus a backfilling refresh when removals leave the page half empty.
    pub const fn backfilling() -> Self {
        Self {
            rows_change: RowsChangePolicy::PreservePosition,
            refresh_below_half: true,
        }
    }

    pub const fn refresh_below_half(mut self, enabled: bool) -> Self {
        self.refresh_below_half = enabled;
        self
    }
}

/// Current page, page size, totals and the criteria last sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    criteria: Criteria,
    page_no: usize,
    page_count: usize,
    rows_per_page: usize,
    count: usize,
}

impl PaginationState {
    pub fn new(criteria: Criteria, rows_per_page: usize) -> Self {
        Self {
            criteria,
            page_no: 1,
            page_count: 1,
            rows_per_page: rows_per_page.max(1),
            count: 0,
        }
    }

    pub fn criteria(&self) -> &Criteria {
        &self.criteria
    }

    pub fn page_no(&self) -> usize {
        self.page_no
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Total matching records reported by the last successful fetch.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_more(&self) -> bool {
        self.page_no < self.page_count
    }

    /// Clamps a requested page into `[1, page_count]`.
    pub fn clamp_page(&self, requested: i64) -> usize {
        self.clamp_page_for(requested, self.rows_per_page)
    }

    /// Clamps a requested page against the page count the last known total would
    /// have at `rows_per_page`.
    pub fn clamp_page_for(&self, requested: i64, rows_per_page: usize) -> usize {
        if requested <= 0 {
            return 1;
        }
        usize::try_from(requested)
            .unwrap_or(usize::MAX)
            .min(page_count_for(self.count, rows_per_page))
            .max(1)
    }

    /// Copies `criteria` and injects the paging parameters.
    pub fn paged_request(
        criteria: &Criteria,
        page_no_key: &str,
        page_no: usize,
        rows_key: &str,
        rows_per_page: usize,
    ) -> Criteria {
        let mut request = criteria.clone();
        request.insert(page_no_key.to_string(), Value::from(page_no));
        request.insert(rows_key.to_string(), Value::from(rows_per_page));
        request
    }

    /// Records the outcome of a successful fetch.
    pub fn commit(&mut self, sent: Criteria, page_no: usize, rows_per_page: usize, count: usize) {
        self.page_count = page_count_for(count, rows_per_page);
        self.page_no = page_no.clamp(1, self.page_count);
        self.rows_per_page = rows_per_page;
        self.count = count;
        self.criteria = sent;
    }
}
