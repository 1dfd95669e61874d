//! In-memory Data Gateway.

use crate::auth::CurrentUser;
use crate::error::GatewayError;
use crate::gateway::{AuthProvider, EventGateway, ImageStore, ListingGateway, ProfileGateway, Result};
use crate::query::{ListingQuery, Page};
use crate::types::{
    Event, EventId, Listing, ListingId, ListingWithEvent, NewEvent, NewListing, SellerSummary,
    UserId, UserProfile,
};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Gateway operations that can be made to fail
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `search_listings`
    Search,
    /// `create_listing`
    CreateListing,
    /// `listings_by_seller`
    SellerListings,
    /// `upcoming_events`
    LoadEvents,
    /// `create_event`
    CreateEvent,
    /// `upload`
    Upload,
    /// `profile`
    Profile,
    /// Every auth call
    Auth,
}

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    listings: Vec<Listing>,
    sellers: HashMap<UserId, SellerSummary>,
    profiles: HashMap<UserId, UserProfile>,
    accounts: HashMap<String, (String, CurrentUser)>,
    session: Option<CurrentUser>,
    objects: HashMap<String, (Arc<[u8]>, String)>,
    failing: HashSet<Operation>,
    failing_uploads: Vec<Vec<u8>>,
    search_log: Vec<ListingQuery>,
    search_delays: VecDeque<Duration>,
    upload_delay: Option<Duration>,
    uploads_in_flight: usize,
    max_uploads_in_flight: usize,
}

/// Gateway over in-memory tables
///
/// Evaluates [`ListingQuery`] predicates directly, so searches behave like
/// the backend for the supported filters. Clones share the same tables.
#[derive(Clone, Default)]
pub struct InMemoryGateway {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for InMemoryGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("InMemoryGateway")
            .field("events", &inner.events.len())
            .field("listings", &inner.listings.len())
            .finish_non_exhaustive()
    }
}

impl InMemoryGateway {
    /// Empty gateway
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self, operation: Operation) -> Result<()> {
        if self.lock().failing.contains(&operation) {
            return Err(GatewayError::Remote(format!("{operation:?} failed")));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------

    /// Add an event to the catalog
    pub fn add_event(&self, event: Event) {
        self.lock().events.push(event);
    }

    /// Add a listing; its event should already exist
    pub fn add_listing(&self, listing: Listing) {
        self.lock().listings.push(listing);
    }

    /// Add seller details embedded into search results
    pub fn add_seller(&self, seller: SellerSummary) {
        self.lock().sellers.insert(seller.id, seller);
    }

    /// Add a profile row
    pub fn add_profile(&self, profile: UserProfile) {
        self.lock().profiles.insert(profile.id, profile);
    }

    /// Create an account that can sign in
    pub fn register_user(&self, email: &str, password: &str, name: &str) -> CurrentUser {
        let user = CurrentUser {
            id: UserId::new(),
            email: Some(email.to_string()),
            name: Some(name.to_string()),
        };
        self.lock()
            .accounts
            .insert(email.to_string(), (password.to_string(), user.clone()));
        user
    }

    /// Replace the persisted session
    pub fn set_session(&self, user: Option<CurrentUser>) {
        self.lock().session = user;
    }

    // ------------------------------------------------------------------
    // Failure and timing injection
    // ------------------------------------------------------------------

    /// Make `operation` fail until [`InMemoryGateway::recover`]
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Undo [`InMemoryGateway::fail`]
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// Fail uploads whose content equals `bytes`
    pub fn fail_uploads_of(&self, bytes: &[u8]) {
        self.lock().failing_uploads.push(bytes.to_vec());
    }

    /// Delay the next searches, one duration per call
    pub fn delay_searches(&self, delays: impl IntoIterator<Item = Duration>) {
        self.lock().search_delays.extend(delays);
    }

    /// Delay every upload
    pub fn delay_uploads(&self, delay: Duration) {
        self.lock().upload_delay = Some(delay);
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Every search query received, in order
    #[must_use]
    pub fn search_log(&self) -> Vec<ListingQuery> {
        self.lock().search_log.clone()
    }

    /// All stored listings
    #[must_use]
    pub fn listings(&self) -> Vec<Listing> {
        self.lock().listings.clone()
    }

    /// All events
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Paths of stored objects
    #[must_use]
    pub fn object_paths(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    /// Highest number of uploads that ran at the same time
    #[must_use]
    pub fn max_concurrent_uploads(&self) -> usize {
        self.lock().max_uploads_in_flight
    }

    fn joined(inner: &Inner, listing: &Listing) -> Option<ListingWithEvent> {
        let event = inner.events.iter().find(|e| e.id == listing.event_id)?;
        Some(ListingWithEvent {
            listing: listing.clone(),
            event: event.clone(),
            seller: inner.sellers.get(&listing.seller_id).cloned(),
        })
    }
}

impl ListingGateway for InMemoryGateway {
    fn search_listings(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Page<ListingWithEvent>>> + Send {
        let gateway = self.clone();

        async move {
            let delay = {
                let mut inner = gateway.lock();
                inner.search_log.push(query.clone());
                inner.search_delays.pop_front()
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            gateway.check(Operation::Search)?;

            let inner = gateway.lock();
            let mut rows: Vec<ListingWithEvent> = inner
                .listings
                .iter()
                .filter_map(|listing| Self::joined(&inner, listing))
                .filter(|row| query.matches(row))
                .collect();
            if let Some(sort) = query.sort {
                rows.sort_by(|a, b| sort.compare(a, b));
            }

            let total = rows.len();
            let items = rows
                .into_iter()
                .skip(query.page.offset)
                .take(query.page.limit)
                .collect();
            Ok(Page { items, total })
        }
    }

    fn create_listing(&self, listing: NewListing) -> impl Future<Output = Result<Listing>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::CreateListing)?;
            let now = Utc::now();
            let stored = Listing {
                id: ListingId::new(),
                event_id: listing.event_id,
                seller_id: listing.seller_id,
                price: listing.price,
                original_price: listing.original_price,
                quantity: listing.quantity,
                available_quantity: listing.available_quantity,
                section: listing.section,
                row: listing.row,
                seat_numbers: listing.seat_numbers,
                ticket_type: listing.ticket_type,
                status: listing.status,
                images: listing.images,
                notes: listing.notes,
                delivery_method: listing.delivery_method,
                created_at: now,
                updated_at: now,
            };
            gateway.lock().listings.push(stored.clone());
            Ok(stored)
        }
    }

    fn listings_by_seller(
        &self,
        seller: UserId,
    ) -> impl Future<Output = Result<Vec<ListingWithEvent>>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::SellerListings)?;
            let inner = gateway.lock();
            let mut rows: Vec<ListingWithEvent> = inner
                .listings
                .iter()
                .filter(|listing| listing.seller_id == seller)
                .filter_map(|listing| Self::joined(&inner, listing))
                .collect();
            rows.sort_by(|a, b| b.listing.created_at.cmp(&a.listing.created_at));
            Ok(rows)
        }
    }
}

impl EventGateway for InMemoryGateway {
    fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::LoadEvents)?;
            let mut events: Vec<Event> = gateway
                .lock()
                .events
                .iter()
                .filter(|event| event.date >= from)
                .cloned()
                .collect();
            events.sort_by_key(|event| event.date);
            events.truncate(limit);
            Ok(events)
        }
    }

    fn create_event(&self, event: NewEvent) -> impl Future<Output = Result<Event>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::CreateEvent)?;
            let now = Utc::now();
            let stored = Event {
                id: EventId::new(),
                title: event.title,
                description: event.description,
                date: event.date,
                location: event.location,
                category: event.category,
                image_url: None,
                venue: event.venue,
                city: event.city,
                state: event.state,
                country: event.country,
                created_at: now,
                updated_at: now,
            };
            gateway.lock().events.push(stored.clone());
            Ok(stored)
        }
    }
}

impl ImageStore for InMemoryGateway {
    fn upload(
        &self,
        path: String,
        bytes: Arc<[u8]>,
        content_type: String,
    ) -> impl Future<Output = Result<()>> + Send {
        let gateway = self.clone();

        async move {
            let delay = {
                let mut inner = gateway.lock();
                inner.uploads_in_flight += 1;
                inner.max_uploads_in_flight = inner.max_uploads_in_flight.max(inner.uploads_in_flight);
                inner.upload_delay
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut inner = gateway.lock();
            inner.uploads_in_flight -= 1;
            if inner.failing.contains(&Operation::Upload)
                || inner.failing_uploads.iter().any(|b| b[..] == bytes[..])
            {
                return Err(GatewayError::Remote(format!("upload of {path} failed")));
            }
            if inner.objects.contains_key(&path) {
                return Err(GatewayError::Remote(format!("{path} already exists")));
            }
            inner.objects.insert(path, (bytes, content_type));
            Ok(())
        }
    }

    fn public_url(&self, path: &str) -> Result<String> {
        Ok(format!("memory://tickets/{path}"))
    }
}

impl ProfileGateway for InMemoryGateway {
    fn profile(&self, user: UserId) -> impl Future<Output = Result<UserProfile>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::Profile)?;
            gateway
                .lock()
                .profiles
                .get(&user)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(format!("profile {user}")))
        }
    }
}

impl AuthProvider for InMemoryGateway {
    fn restore_session(&self) -> impl Future<Output = Result<Option<CurrentUser>>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::Auth)?;
            Ok(gateway.lock().session.clone())
        }
    }

    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = Result<CurrentUser>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::Auth)?;
            let mut inner = gateway.lock();
            let user = match inner.accounts.get(&email) {
                Some((expected, user)) if *expected == password => user.clone(),
                _ => {
                    return Err(GatewayError::Unauthorized(
                        "Invalid login credentials".to_string(),
                    ));
                },
            };
            inner.session = Some(user.clone());
            Ok(user)
        }
    }

    fn sign_up(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> impl Future<Output = Result<Option<CurrentUser>>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::Auth)?;
            if gateway.lock().accounts.contains_key(&email) {
                return Err(GatewayError::Remote("User already registered".to_string()));
            }
            let user = gateway.register_user(&email, &password, &name);
            gateway.lock().session = Some(user.clone());
            Ok(Some(user))
        }
    }

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send {
        let gateway = self.clone();

        async move {
            gateway.check(Operation::Auth)?;
            gateway.lock().session = None;
            Ok(())
        }
    }
}
