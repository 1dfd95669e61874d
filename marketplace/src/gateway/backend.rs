//! Gateway implementation over the hosted backend.

use super::{AuthProvider, EventGateway, ImageStore, ListingGateway, ProfileGateway, Result};
use crate::auth::CurrentUser;
use crate::error::GatewayError;
use crate::query::{ListingQuery, Page, Predicate, SortOrder};
use crate::types::{Event, Listing, ListingWithEvent, NewEvent, NewListing, UserId, UserProfile};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use ticketdock_backend::{AuthUser, BackendClient, Direction, TableQuery};

const LISTINGS: &str = "tickets";
const EVENTS: &str = "events";
const USERS: &str = "users";

/// Embeds event and seller; `!inner` lets event filters narrow the listings
const SEARCH_SELECT: &str = "*, event:events!inner(*), seller:users(id, name, rating, verified)";
const SELLER_SELECT: &str = "*, event:events(*), seller:users(id, name, rating, verified)";

/// Data Gateway backed by [`BackendClient`]
#[derive(Clone, Debug)]
pub struct BackendGateway {
    client: BackendClient,
    bucket: String,
}

impl BackendGateway {
    /// Wrap a client; images go to `bucket`
    #[must_use]
    pub fn new(client: BackendClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Underlying client
    #[must_use]
    pub const fn client(&self) -> &BackendClient {
        &self.client
    }
}

/// Render a listing query as a table query
#[must_use]
pub fn table_query(query: &ListingQuery) -> TableQuery {
    let mut table = TableQuery::new(LISTINGS).select(SEARCH_SELECT).count_exact();

    for predicate in &query.predicates {
        table = match predicate {
            Predicate::Eq(column, value) => table.eq(column.wire_name(), value),
            Predicate::Gt(column, value) => table.gt(column.wire_name(), value),
            Predicate::Gte(column, value) => table.gte(column.wire_name(), value),
            Predicate::Lte(column, value) => table.lte(column.wire_name(), value),
            Predicate::TextSearch { columns, term } => {
                let names: Vec<&str> = columns.iter().map(|c| c.wire_name()).collect();
                table.any_ilike(&names, term)
            },
        };
    }

    if let Some(sort) = query.sort {
        let direction = match sort.order {
            SortOrder::Asc => Direction::Ascending,
            SortOrder::Desc => Direction::Descending,
        };
        table = table.order(sort.column.wire_name(), direction);
    }

    table.range(query.page.offset, query.page.limit)
}

fn current_user(user: &AuthUser) -> Result<CurrentUser> {
    let id: UserId = user
        .id
        .parse()
        .map_err(|e| GatewayError::Decode(format!("user id {:?}: {e}", user.id)))?;
    Ok(CurrentUser {
        id,
        email: user.email.clone(),
        name: user.name().map(str::to_string),
    })
}

/// Reject a row whose available quantity exceeds its quantity
fn checked_listing(listing: Listing) -> Result<Listing> {
    listing
        .validate_quantities()
        .map_err(|e| GatewayError::Decode(format!("listing {}: {e}", listing.id)))?;
    Ok(listing)
}

fn checked_rows(rows: Vec<ListingWithEvent>) -> Result<Vec<ListingWithEvent>> {
    for row in &rows {
        row.listing
            .validate_quantities()
            .map_err(|e| GatewayError::Decode(format!("listing {}: {e}", row.listing.id)))?;
    }
    Ok(rows)
}

impl ListingGateway for BackendGateway {
    fn search_listings(
        &self,
        query: ListingQuery,
    ) -> impl Future<Output = Result<Page<ListingWithEvent>>> + Send {
        let client = self.client.clone();

        async move {
            let result = client
                .select::<ListingWithEvent>(&table_query(&query))
                .await?;
            Ok(Page {
                total: result.total.unwrap_or(0),
                items: checked_rows(result.rows)?,
            })
        }
    }

    fn create_listing(&self, listing: NewListing) -> impl Future<Output = Result<Listing>> + Send {
        let client = self.client.clone();

        async move { checked_listing(client.insert(LISTINGS, &listing).await?) }
    }

    fn listings_by_seller(
        &self,
        seller: UserId,
    ) -> impl Future<Output = Result<Vec<ListingWithEvent>>> + Send {
        let client = self.client.clone();

        async move {
            let query = TableQuery::new(LISTINGS)
                .select(SELLER_SELECT)
                .eq("seller_id", seller)
                .order("created_at", Direction::Descending);
            checked_rows(client.select(&query).await?.rows)
        }
    }
}

impl EventGateway for BackendGateway {
    fn upcoming_events(
        &self,
        from: DateTime<Utc>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Event>>> + Send {
        let client = self.client.clone();

        async move {
            let query = TableQuery::new(EVENTS)
                .gte("date", from.to_rfc3339_opts(SecondsFormat::Millis, true))
                .order("date", Direction::Ascending)
                .limit(limit);
            Ok(client.select(&query).await?.rows)
        }
    }

    fn create_event(&self, event: NewEvent) -> impl Future<Output = Result<Event>> + Send {
        let client = self.client.clone();

        async move { Ok(client.insert(EVENTS, &event).await?) }
    }
}

impl ImageStore for BackendGateway {
    fn upload(
        &self,
        path: String,
        bytes: Arc<[u8]>,
        content_type: String,
    ) -> impl Future<Output = Result<()>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();

        async move {
            client
                .upload(&bucket, &path, bytes.to_vec(), &content_type)
                .await?;
            Ok(())
        }
    }

    fn public_url(&self, path: &str) -> Result<String> {
        Ok(self.client.public_url(&self.bucket, path)?.to_string())
    }
}

impl ProfileGateway for BackendGateway {
    fn profile(&self, user: UserId) -> impl Future<Output = Result<UserProfile>> + Send {
        let client = self.client.clone();

        async move {
            let query = TableQuery::new(USERS).eq("id", user).limit(1);
            client
                .select::<UserProfile>(&query)
                .await?
                .rows
                .into_iter()
                .next()
                .ok_or_else(|| GatewayError::NotFound(format!("profile {user}")))
        }
    }
}

impl AuthProvider for BackendGateway {
    fn restore_session(&self) -> impl Future<Output = Result<Option<CurrentUser>>> + Send {
        let client = self.client.clone();

        async move {
            if client.session().await.is_none() {
                return Ok(None);
            }
            let user = client.get_user().await?;
            current_user(&user).map(Some)
        }
    }

    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> impl Future<Output = Result<CurrentUser>> + Send {
        let client = self.client.clone();

        async move {
            let session = client.sign_in_with_password(&email, &password).await?;
            current_user(&session.user)
        }
    }

    fn sign_up(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> impl Future<Output = Result<Option<CurrentUser>>> + Send {
        let client = self.client.clone();

        async move {
            let session = client
                .sign_up(&email, &password, json!({ "name": name }))
                .await?;
            session.map(|s| current_user(&s.user)).transpose()
        }
    }

    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send {
        let client = self.client.clone();

        async move { Ok(client.sign_out().await?) }
    }
}
