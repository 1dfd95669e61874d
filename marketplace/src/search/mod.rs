//! Search controller for the browse page.
//!
//! Holds the filter state and a deduplicated, paginated list of active
//! listings. Filter changes and refreshes replace the list; `LoadMore`
//! appends the next page.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod types;

pub use actions::SearchAction;
pub use environment::SearchEnvironment;
pub use reducer::{SearchReducer, LOAD_FAILED};
pub use types::{FilterChange, LoadMode, SearchState};
