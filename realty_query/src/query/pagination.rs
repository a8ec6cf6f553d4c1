//! # Pagination
//!
//! Skip/limit windows and the envelope returned by list operations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::list::SortSpec;

/// `totalItems` reported when counting was skipped.
pub const TOTALS_SKIPPED: i64 = -1;

/// Part of a result set to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageWindow {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl PageWindow {
    /// Window for a 1-based page.
    ///
    /// ```
    /// use realty_query::query::pagination::PageWindow;
    ///
    /// assert_eq!(PageWindow::page(1, 10).skip, 0);
    /// assert_eq!(PageWindow::page(3, 10).skip, 20);
    /// assert_eq!(PageWindow::page(3, 10).limit, Some(10));
    /// ```
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            skip: u64::from(page.saturating_sub(1)) * u64::from(limit),
            limit: Some(u64::from(limit)),
        }
    }

    /// Unwindowed read, capped at `max_results` documents.
    pub const fn capped(max_results: u64) -> Self {
        Self {
            skip: 0,
            limit: Some(max_results),
        }
    }
}

/// Number of pages needed for `total_items`; zero when counting was skipped.
pub fn total_pages(total_items: i64, limit: u32) -> i64 {
    if total_items <= 0 || limit == 0 {
        return 0;
    }
    (total_items + i64::from(limit) - 1) / i64::from(limit)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: i64,
    pub showing: usize,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total_items: Option<u64>, showing: usize) -> Self {
        let total_items = total_items
            .map_or(TOTALS_SKIPPED, |total| i64::try_from(total).unwrap_or(i64::MAX));
        Self {
            page,
            limit,
            total_items,
            total_pages: total_pages(total_items, limit),
            showing,
        }
    }

    pub const fn totals_skipped(&self) -> bool {
        self.total_items == TOTALS_SKIPPED
    }
}

/// Result of a paginated list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationEnvelope<T> {
    pub pagination: Pagination,
    /// Sort as requested.
    pub sort: SortSpec,
    /// Effective search term and caller supplied filters.
    pub filters: Map<String, JsonValue>,
    pub result: Vec<T>,
}

impl<T> PaginationEnvelope<T> {
    /// Converts every result, keeping the metadata.
    pub fn try_map<U, E, F>(self, f: F) -> Result<PaginationEnvelope<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        Ok(PaginationEnvelope {
            pagination: self.pagination,
            sort: self.sort,
            filters: self.filters,
            result: self.result.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}
