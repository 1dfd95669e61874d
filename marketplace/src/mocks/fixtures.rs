//! Row builders for tests and demos.

use crate::types::{
    DeliveryMethod, Event, EventId, Listing, ListingId, ListingStatus, ListingWithEvent, Money,
    TicketType, UserId,
};
use chrono::{DateTime, Duration, Utc};

/// Reference time of fixtures: 2025-01-01 00:00:00 UTC
#[must_use]
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_089)
}

/// An event thirty days after [`epoch`]
#[must_use]
pub fn event(title: &str, category: &str) -> Event {
    event_on(title, category, epoch() + Duration::days(30))
}

/// An event on a given date
#[must_use]
pub fn event_on(title: &str, category: &str, date: DateTime<Utc>) -> Event {
    Event {
        id: EventId::new(),
        title: title.to_string(),
        description: None,
        date,
        location: "Austin, TX".to_string(),
        category: category.to_string(),
        image_url: None,
        venue: None,
        city: Some("Austin".to_string()),
        state: Some("TX".to_string()),
        country: "US".to_string(),
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// An active listing of two tickets for `event`
#[must_use]
pub fn listing(event: &Event, price: Money) -> Listing {
    Listing {
        id: ListingId::new(),
        event_id: event.id,
        seller_id: UserId::new(),
        price,
        original_price: None,
        quantity: 2,
        available_quantity: 2,
        section: None,
        row: None,
        seat_numbers: None,
        ticket_type: TicketType::General,
        status: ListingStatus::Active,
        images: Vec::new(),
        notes: None,
        delivery_method: DeliveryMethod::Electronic,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// A search result row: a fresh listing joined with `event`
#[must_use]
pub fn row(event: &Event, price: Money) -> ListingWithEvent {
    ListingWithEvent {
        listing: listing(event, price),
        event: event.clone(),
        seller: None,
    }
}
