//! Data Gateway: the seams between features and the hosted backend.
//!
//! Features depend on these traits, never on the HTTP client. Production
//! wires [`BackendGateway`]; tests use
//! [`InMemoryGateway`](crate::mocks::InMemoryGateway).

use crate::auth::CurrentUser;
use crate::error::GatewayError;
use crate::query::{ListingQuery, Page};
use crate::types::{Event, Listing, ListingWithEvent, NewEvent, NewListing, UserId, UserProfile};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;

pub mod backend;

pub use backend::BackendGateway;

/// Result type for gateway calls
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Listing reads and writes
pub trait ListingGateway: Send + Sync {
    /// Run a search query and return one page
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend call fails.
    fn search_listings(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Page<ListingWithEvent>>> + Send;

    /// Insert a listing and return it as stored
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the insert fails.
    fn create_listing(&self, listing: NewListing) -> impl Future<Output = Result<Listing>> + Send;

    /// All listings of one seller, newest first, any status
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend call fails.
    fn listings_by_seller(
        &self,
        seller: UserId,
    ) -> impl Future<Output = Result<Vec<ListingWithEvent>>> + Send;
}

/// Event catalog
pub trait EventGateway: Send + Sync {
    /// Events dated at or after `from`, soonest first, at most `limit`
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the backend call fails.
    fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send;

    /// Insert an event and return it as stored
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the insert fails.
    fn create_event(&self, event: NewEvent) -> impl Future<Output = Result<Event>> + Send;
}

/// Binary object store for listing images
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `path`; never overwrites
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the upload fails or the path is taken.
    fn upload(
        &self,
        path: String,
        bytes: Arc<[u8]>,
        content_type: String,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Public URL of a stored object
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if no URL can be formed for `path`.
    fn public_url(&self, path: &str) -> Result<String>;
}

/// User profiles
pub trait ProfileGateway: Send + Sync {
    /// Profile of one user
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` if the user has no profile row.
    fn profile(&self, user: UserId) -> impl Future<Output = Result<UserProfile>> + Send;
}

/// Password authentication and session access
pub trait AuthProvider: Send + Sync {
    /// User of the persisted session, if any
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the session cannot be checked.
    fn restore_session(&self) -> impl Future<Output = Result<Option<CurrentUser>>> + Send;

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unauthorized` for rejected credentials.
    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = Result<CurrentUser>> + Send;

    /// Register; `None` while an email confirmation is pending
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if registration fails.
    fn sign_up(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> impl Future<Output = Result<Option<CurrentUser>>> + Send;

    /// End the session
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the remote sign-out fails.
    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;
}
