//! # Ticketdock Marketplace
//!
//! Client-side core of a peer-to-peer ticket marketplace: browsing active
//! listings, listing tickets for sale, and the signed-in user's pages.
//!
//! Each page is a reducer driven by a [`ticketdock_runtime::Store`]:
//!
//! - [`search`]: filterable, paginated listing search (browse page)
//! - [`wizard`]: the four-step sell-tickets wizard with image uploads
//! - [`account`]: "my tickets" and profile
//!
//! Remote work goes through the Data Gateway traits in [`gateway`]; the
//! production implementation talks to the hosted backend through
//! `ticketdock-backend`, while [`mocks::InMemoryGateway`] serves tests and
//! demos. The signed-in user lives in one [`auth::AuthContext`] shared by
//! every feature, and [`routing::guard`] decides what each route shows.
//!
//! ## Example
//!
//! ```no_run
//! use marketplace::mocks::{InMemoryGateway, RecordingNotifier};
//! use marketplace::search::{FilterChange, SearchAction, SearchEnvironment, SearchReducer, SearchState};
//! use std::sync::Arc;
//! use ticketdock_runtime::Store;
//!
//! # async fn example() -> Result<(), ticketdock_runtime::StoreError> {
//! let env = SearchEnvironment::new(
//!     Arc::new(InMemoryGateway::new()),
//!     Arc::new(RecordingNotifier::new()),
//! );
//! let store = Store::new(SearchState::default(), SearchReducer::new(), env);
//!
//! let mut handle = store
//!     .send(SearchAction::UpdateFilters(vec![FilterChange::Category("Music".into())]))
//!     .await?;
//! handle.wait().await;
//!
//! let shown = store.state(|s| s.listings.len()).await;
//! println!("{shown} listings");
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mocks;
pub mod notification;
pub mod query;
pub mod routing;
pub mod search;
pub mod types;
pub mod wizard;

pub use auth::{AuthContext, AuthStatus, CurrentUser};
pub use config::{AppConfig, ConfigError};
pub use error::{GatewayError, ValidationError};
pub use notification::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use routing::{guard, Navigation, Route};
pub use types::{Event, EventId, Listing, ListingId, ListingWithEvent, Money, UserId};
