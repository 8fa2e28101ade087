//! Server-side pagination.
//!
//! Every list endpoint takes `start`, `limit` and `search` and answers with
//! `{ "data": [...], "count": n }` where `count` is the total across pages.

use serde::{Deserialize, Serialize};

/// Rows per page used by most master-data tables.
pub const DEFAULT_ROWS_PER_PAGE: u64 = 10;

/// Query parameters sent to a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub start: u64,
    pub limit: u64,
    pub search: String,
}

impl ListQuery {
    /// Query for a zero-based `page` of `rows_per_page` rows.
    pub fn for_page(page: u64, rows_per_page: u64, search: impl Into<String>) -> Self {
        Self {
            start: page.saturating_mul(rows_per_page),
            limit: rows_per_page,
            search: search.into(),
        }
    }

    /// Unpaged lookup (used by dropdown sources such as `/countries?search=`).
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            start: 0,
            limit: 0,
            search: search.into(),
        }
    }

    /// `(key, value)` pairs for the query string.
    ///
    /// A zero `limit` means "unpaged" and omits `start`/`limit` entirely.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if self.limit > 0 {
            params.push(("start", self.start.to_string()));
            params.push(("limit", self.limit.to_string()));
        }
        params.push(("search", self.search.clone()));
        params
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::for_page(0, DEFAULT_ROWS_PER_PAGE, "")
    }
}

/// One page of a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub count: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Table pager state (zero-based page index + page size).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: u64,
    rows_per_page: u64,
}

impl Pager {
    pub fn new(rows_per_page: u64) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn rows_per_page(&self) -> u64 {
        self.rows_per_page
    }

    pub fn set_page(&mut self, page: u64) {
        self.page = page;
    }

    /// Changing the page size always returns to the first page.
    pub fn set_rows_per_page(&mut self, rows_per_page: u64) {
        self.rows_per_page = rows_per_page.max(1);
        self.page = 0;
    }

    /// A new search term also returns to the first page.
    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn query(&self, search: impl Into<String>) -> ListQuery {
        ListQuery::for_page(self.page, self.rows_per_page, search)
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(self.rows_per_page).max(1)
    }

    /// Filler rows needed to keep the table height stable on a short page.
    pub fn empty_rows(&self, rows_on_page: usize) -> u64 {
        self.rows_per_page.saturating_sub(rows_on_page as u64)
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}
