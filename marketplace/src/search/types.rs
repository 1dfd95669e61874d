//! State types for the search controller.

use crate::query::{SearchFilters, SortKey, SortOrder};
use crate::types::{ListingWithEvent, Money};
use chrono::{DateTime, Utc};

/// One change to the search filters
///
/// Text filters given as empty (or blank) strings are cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterChange {
    /// Free text against event title and location
    Query(String),
    /// Event category
    Category(String),
    /// Price bounds, inclusive
    PriceRange {
        /// Lowest price
        min: Option<Money>,
        /// Highest price
        max: Option<Money>,
    },
    /// Event city
    City(String),
    /// Event state / region
    Region(String),
    /// Event date bounds, inclusive
    DateRange {
        /// Earliest date
        start: Option<DateTime<Utc>>,
        /// Latest date
        end: Option<DateTime<Utc>>,
    },
    /// Sort key and direction
    Sort {
        /// Key
        by: SortKey,
        /// Direction
        order: SortOrder,
    },
    /// Page size (at least 1)
    PageSize(usize),
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

impl FilterChange {
    /// Merge this change into `filters`
    pub fn apply(self, filters: &mut SearchFilters) {
        match self {
            Self::Query(text) => filters.search_query = non_blank(text),
            Self::Category(text) => filters.event_category = non_blank(text),
            Self::PriceRange { min, max } => {
                filters.min_price = min;
                filters.max_price = max;
            },
            Self::City(text) => filters.event_city = non_blank(text),
            Self::Region(text) => filters.event_state = non_blank(text),
            Self::DateRange { start, end } => {
                filters.start_date = start;
                filters.end_date = end;
            },
            Self::Sort { by, order } => {
                filters.sort_by = by;
                filters.sort_order = order;
            },
            Self::PageSize(size) => filters.limit = size.max(1),
        }
    }
}

/// Whether a fetched page replaces or extends the result list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadMode {
    /// First page after a filter change or refresh
    Replace,
    /// Next page for `LoadMore`
    Append,
}

/// State of one search screen
#[derive(Clone, Debug, PartialEq)]
pub struct SearchState {
    /// Current filters; `offset` is that of the last requested page
    pub filters: SearchFilters,
    /// Listings shown, in result order, without duplicates
    pub listings: Vec<ListingWithEvent>,
    /// A fetch is outstanding
    pub loading: bool,
    /// Message of the last failed fetch
    pub error: Option<String>,
    /// The last page was full, so another may exist
    pub has_more: bool,
    /// Exact number of matching listings
    pub total_count: usize,
    /// Number of the latest fetch issued; older responses are stale
    pub latest_request: u64,
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(SearchFilters::default())
    }
}

impl SearchState {
    /// State with initial filters; nothing is loaded until `Refresh`
    ///
    /// `has_more` starts false so `LoadMore` waits for the first page.
    #[must_use]
    pub const fn new(filters: SearchFilters) -> Self {
        Self {
            filters,
            listings: Vec::new(),
            loading: false,
            error: None,
            has_more: false,
            total_count: 0,
            latest_request: 0,
        }
    }

    /// Number of narrowing filters set, as shown on the filter button
    ///
    /// The free-text query and the sort do not count.
    #[must_use]
    pub fn active_filter_count(&self) -> usize {
        let f = &self.filters;
        [
            f.event_category.is_some(),
            f.min_price.is_some(),
            f.max_price.is_some(),
            f.event_city.is_some(),
            f.event_state.is_some(),
            f.start_date.is_some(),
            f.end_date.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }

    /// Whether `LoadMore` would issue a fetch
    #[must_use]
    pub const fn can_load_more(&self) -> bool {
        self.has_more && !self.loading
    }
}
