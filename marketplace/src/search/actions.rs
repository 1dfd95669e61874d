//! Actions of the search controller.

use super::types::{FilterChange, LoadMode};
use crate::query::Page;
use crate::types::ListingWithEvent;

/// Search controller actions
#[derive(Clone, Debug)]
pub enum SearchAction {
    /// Merge filter changes, reset the offset and fetch the first page
    UpdateFilters(Vec<FilterChange>),

    /// Clear category, price, location and date filters and fetch again
    ClearFilters,

    /// Fetch the next page, unless one is in flight or none is left
    LoadMore,

    /// Fetch the first page again with the current filters (also sent on mount)
    Refresh,

    /// A fetch succeeded
    PageLoaded {
        /// Request number the page answers
        request: u64,
        /// Replace or append
        mode: LoadMode,
        /// Rows and total
        page: Page<ListingWithEvent>,
    },

    /// A fetch failed
    PageFailed {
        /// Request number that failed
        request: u64,
        /// Replace or append
        mode: LoadMode,
        /// Error description, for logs
        error: String,
    },
}
