//! Search controller reducer.
//!
//! Every fetch gets a request number. Only the response to the latest
//! number is applied; anything older is dropped, so overlapping filter
//! changes can never leave a stale page on screen.

use super::actions::SearchAction;
use super::environment::SearchEnvironment;
use super::types::{LoadMode, SearchState};
use crate::gateway::ListingGateway;
use crate::notification::{notify, Notification};
use crate::query::{ListingQuery, Page};
use crate::types::{ListingId, ListingWithEvent};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use ticketdock_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Message shown when a page cannot be fetched
pub const LOAD_FAILED: &str = "Failed to load tickets";

/// Reducer for the search controller
pub struct SearchReducer<G> {
    _gateway: PhantomData<fn() -> G>,
}

impl<G> SearchReducer<G> {
    /// Creates a new `SearchReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _gateway: PhantomData,
        }
    }
}

impl<G> Default for SearchReducer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Clone for SearchReducer<G> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G> std::fmt::Debug for SearchReducer<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SearchReducer")
    }
}

impl<G: ListingGateway + 'static> SearchReducer<G> {
    /// Issue a fetch for the page at the current offset
    fn start_fetch(
        state: &mut SearchState,
        mode: LoadMode,
        env: &SearchEnvironment<G>,
    ) -> Effect<SearchAction> {
        if mode == LoadMode::Replace {
            state.filters.offset = 0;
        }
        state.latest_request += 1;
        state.loading = true;
        state.error = None;

        let request = state.latest_request;
        let query = ListingQuery::for_search(&state.filters, state.filters.offset);
        tracing::debug!(request, ?mode, offset = state.filters.offset, "fetching listings");

        let gateway = Arc::clone(&env.gateway);
        async_effect! {
            match gateway.search_listings(query).await {
                Ok(page) => Some(SearchAction::PageLoaded { request, mode, page }),
                Err(error) => Some(SearchAction::PageFailed {
                    request,
                    mode,
                    error: error.to_string(),
                }),
            }
        }
    }

    fn apply_page(state: &mut SearchState, mode: LoadMode, page: Page<ListingWithEvent>) {
        state.loading = false;
        state.error = None;
        state.has_more = page.items.len() >= state.filters.limit;
        state.total_count = page.total;

        match mode {
            LoadMode::Replace => state.listings = page.items,
            LoadMode::Append => {
                let mut seen: HashSet<ListingId> =
                    state.listings.iter().map(|row| row.listing.id).collect();
                state
                    .listings
                    .extend(page.items.into_iter().filter(|row| seen.insert(row.listing.id)));
            },
        }
    }

    fn apply_failure(state: &mut SearchState, mode: LoadMode) {
        state.loading = false;
        state.error = Some(LOAD_FAILED.to_string());

        match mode {
            LoadMode::Replace => {
                state.listings.clear();
                state.has_more = false;
                state.total_count = 0;
            },
            // The next LoadMore retries the same page
            LoadMode::Append => {
                state.filters.offset = state.filters.offset.saturating_sub(state.filters.limit);
            },
        }
    }
}

impl<G: ListingGateway + 'static> Reducer for SearchReducer<G> {
    type State = SearchState;
    type Action = SearchAction;
    type Environment = SearchEnvironment<G>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SearchAction::UpdateFilters(changes) => {
                for change in changes {
                    change.apply(&mut state.filters);
                }
                smallvec![Self::start_fetch(state, LoadMode::Replace, env)]
            },

            SearchAction::ClearFilters => {
                let filters = &mut state.filters;
                filters.event_category = None;
                filters.min_price = None;
                filters.max_price = None;
                filters.event_city = None;
                filters.event_state = None;
                filters.start_date = None;
                filters.end_date = None;
                smallvec![Self::start_fetch(state, LoadMode::Replace, env)]
            },

            SearchAction::Refresh => smallvec![Self::start_fetch(state, LoadMode::Replace, env)],

            SearchAction::LoadMore => {
                if !state.can_load_more() {
                    tracing::debug!(
                        loading = state.loading,
                        has_more = state.has_more,
                        "load more ignored"
                    );
                    return SmallVec::new();
                }
                state.filters.offset += state.filters.limit;
                smallvec![Self::start_fetch(state, LoadMode::Append, env)]
            },

            SearchAction::PageLoaded {
                request,
                mode,
                page,
            } => {
                if request != state.latest_request {
                    tracing::debug!(request, latest = state.latest_request, "discarding stale page");
                    return SmallVec::new();
                }
                tracing::debug!(request, rows = page.items.len(), total = page.total, "page loaded");
                Self::apply_page(state, mode, page);
                SmallVec::new()
            },

            SearchAction::PageFailed {
                request,
                mode,
                error,
            } => {
                if request != state.latest_request {
                    tracing::debug!(request, latest = state.latest_request, %error, "discarding stale failure");
                    return SmallVec::new();
                }
                tracing::warn!(request, ?mode, %error, "listing search failed");
                Self::apply_failure(state, mode);

                smallvec![notify(&env.notifier, [Notification::error(LOAD_FAILED)])]
            },
        }
    }
}
