//! State and actions of the account pages.

use crate::routing::Route;
use crate::types::{ListingStatus, ListingWithEvent, UserProfile};

/// State behind "my tickets" and "profile"
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountState {
    /// Profile of the signed-in user
    pub profile: Option<UserProfile>,
    /// The user's listings, newest first, any status
    pub listings: Vec<ListingWithEvent>,
    /// Profile fetch outstanding
    pub loading_profile: bool,
    /// Listings fetch outstanding
    pub loading_listings: bool,
    /// Message of the last failure
    pub error: Option<String>,
    /// Sign-out in progress
    pub signing_out: bool,
    /// Where the view should navigate
    pub redirect: Option<Route>,
}

impl AccountState {
    /// Listings with the given status
    pub fn with_status(&self, status: ListingStatus) -> impl Iterator<Item = &ListingWithEvent> {
        self.listings
            .iter()
            .filter(move |row| row.listing.status == status)
    }

    /// Either fetch is outstanding
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading_profile || self.loading_listings
    }
}

/// Account actions
#[derive(Clone, Debug)]
pub enum AccountAction {
    /// Fetch profile and listings of the signed-in user
    Load,
    /// Profile fetched
    ProfileLoaded(UserProfile),
    /// Profile fetch failed
    ProfileFailed(String),
    /// Listings fetched
    ListingsLoaded(Vec<ListingWithEvent>),
    /// Listings fetch failed
    ListingsFailed(String),
    /// Tear down the session
    SignOut,
    /// Session torn down
    SignedOut,
}
