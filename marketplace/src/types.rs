//! Domain types for the ticket marketplace.
//!
//! Rows mirror the backend's tables (`events`, `tickets`, `users`); field
//! names follow the wire format except where noted.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a ticket listing
    ListingId
);
uuid_id!(
    /// Unique identifier for an event
    EventId
);
uuid_id!(
    /// Unique identifier for a user (seller or buyer)
    UserId
);

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
///
/// On the wire the backend stores prices as `numeric` in major units, so
/// serde reads and writes a JSON number such as `49.99`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from dollars with overflow checking
    #[must_use]
    pub const fn checked_from_dollars(dollars: u64) -> Option<Self> {
        match dollars.checked_mul(100) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse user-entered text: `"12"`, `"12.5"`, `"12.50"`, `".5"`
    ///
    /// Surrounding whitespace is ignored. Signs, exponents and more than two
    /// fractional digits are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAmount`] if the text is not an amount.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidAmount(text.to_string());
        let trimmed = text.trim();

        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty())
            || !all_digits(whole)
            || !all_digits(fraction)
            || fraction.len() > 2
        {
            return Err(invalid());
        }

        let dollars: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Amount in major units, for the wire
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Prices are far below 2^52 cents
    pub fn as_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Convert a wire amount in major units, rounding to the nearest cent
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )] // Range checked first
    pub fn from_major_units(amount: f64) -> Option<Self> {
        let cents = (amount * 100.0).round();
        (0.0..=u64::MAX as f64)
            .contains(&cents)
            .then(|| Self(cents as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_major_units())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Self::from_major_units(amount)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount {amount}")))
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// Lifecycle of a listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// For sale
    #[default]
    Active,
    /// All tickets sold
    Sold,
    /// Withdrawn by the seller
    Cancelled,
    /// Event date passed
    Expired,
}

impl ListingStatus {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Sold => "sold",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of ticket offered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    /// General admission
    #[default]
    General,
    /// VIP
    Vip,
    /// Premium seating
    Premium,
}

/// How tickets reach the buyer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// Emailed / downloadable
    #[default]
    Electronic,
    /// Paper tickets shipped
    Physical,
    /// Transferred in a mobile app
    Mobile,
}

/// Categories offered by the create-event form
///
/// Stored as free text, so rows with other categories still load and filter.
pub const EVENT_CATEGORIES: [&str; 8] = [
    "Concert", "Sports", "Theater", "Festival", "Comedy", "Dance", "Family", "Other",
];

// ============================================================================
// Rows
// ============================================================================

/// A real-world happening tickets are sold against (`events` table)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event id
    pub id: EventId,
    /// Title shown in search results
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Start date and time
    pub date: DateTime<Utc>,
    /// Free-text location (matched by search)
    pub location: String,
    /// Category (see [`EVENT_CATEGORIES`])
    pub category: String,
    /// Poster image
    #[serde(default)]
    pub image_url: Option<String>,
    /// Venue name
    #[serde(default)]
    pub venue: Option<String>,
    /// City
    #[serde(default)]
    pub city: Option<String>,
    /// State / region
    #[serde(default)]
    pub state: Option<String>,
    /// Country code
    #[serde(default = "default_country")]
    pub country: String,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

fn default_country() -> String {
    "US".to_string()
}

/// A seller's offer of tickets for one event (`tickets` table)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Listing id
    pub id: ListingId,
    /// Event the tickets are for
    pub event_id: EventId,
    /// Seller
    pub seller_id: UserId,
    /// Asking price per ticket
    pub price: Money,
    /// Face value
    #[serde(default)]
    pub original_price: Option<Money>,
    /// Tickets offered
    pub quantity: u32,
    /// Tickets still for sale
    pub available_quantity: u32,
    /// Seating section
    #[serde(default)]
    pub section: Option<String>,
    /// Seating row
    #[serde(default, rename = "row_name")]
    pub row: Option<String>,
    /// Individual seats
    #[serde(default)]
    pub seat_numbers: Option<Vec<String>>,
    /// Ticket kind
    #[serde(default)]
    pub ticket_type: TicketType,
    /// Lifecycle status
    pub status: ListingStatus,
    /// Public image URLs
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<String>,
    /// Seller notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Delivery method
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Check `0 ≤ available_quantity ≤ quantity`
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::QuantityExceeded`] when more tickets are
    /// available than were listed.
    pub const fn validate_quantities(&self) -> Result<(), ValidationError> {
        if self.available_quantity > self.quantity {
            return Err(ValidationError::QuantityExceeded {
                available: self.available_quantity,
                quantity: self.quantity,
            });
        }
        Ok(())
    }

    /// Whether the listing shows up in search
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.status == ListingStatus::Active && self.available_quantity > 0
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Public seller fields embedded in search results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SellerSummary {
    /// Seller id
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Average rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Identity verified
    #[serde(default)]
    pub verified: bool,
}

/// A search result row: listing with its event and seller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingWithEvent {
    /// The listing itself
    #[serde(flatten)]
    pub listing: Listing,
    /// Embedded event
    pub event: Event,
    /// Embedded seller, if visible
    #[serde(default)]
    pub seller: Option<SellerSummary>,
}

/// A user's profile (`users` table)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id (same as the auth user id)
    pub id: UserId,
    /// Email address
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar image
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Identity verified
    #[serde(default)]
    pub verified: bool,
    /// Average rating
    #[serde(default)]
    pub rating: Option<f64>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Insert payloads
// ============================================================================

/// Insert payload for a listing
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewListing {
    /// Event the tickets are for
    pub event_id: EventId,
    /// Seller
    pub seller_id: UserId,
    /// Asking price per ticket
    pub price: Money,
    /// Face value
    pub original_price: Option<Money>,
    /// Tickets offered
    pub quantity: u32,
    /// Starts equal to `quantity`
    pub available_quantity: u32,
    /// Seating section
    pub section: Option<String>,
    /// Seating row
    #[serde(rename = "row_name")]
    pub row: Option<String>,
    /// Individual seats
    pub seat_numbers: Option<Vec<String>>,
    /// Ticket kind
    pub ticket_type: TicketType,
    /// Delivery method
    pub delivery_method: DeliveryMethod,
    /// Public image URLs
    pub images: Vec<String>,
    /// Seller notes
    pub notes: Option<String>,
    /// Always active on creation
    pub status: ListingStatus,
}

/// Insert payload for an event created by a seller
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewEvent {
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Start date and time
    pub date: DateTime<Utc>,
    /// Free-text location
    pub location: String,
    /// Category
    pub category: String,
    /// Venue name
    pub venue: Option<String>,
    /// City
    pub city: Option<String>,
    /// State / region
    pub state: Option<String>,
    /// Country code
    pub country: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn money_parses_user_text() {
        assert_eq!(Money::parse("12").unwrap(), Money::from_cents(1200));
        assert_eq!(Money::parse(" 12.5 ").unwrap(), Money::from_cents(1250));
        assert_eq!(Money::parse("12.05").unwrap(), Money::from_cents(1205));
        assert_eq!(Money::parse(".5").unwrap(), Money::from_cents(50));
        assert_eq!(Money::parse("0").unwrap(), Money::from_cents(0));

        for bad in ["", " ", ".", "abc", "-5", "1.234", "1e3", "12,50", "1.2.3"] {
            assert!(Money::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn money_wire_format_is_major_units() {
        assert_eq!(serde_json::to_value(Money::from_cents(4999)).unwrap(), json!(49.99));
        let parsed: Money = serde_json::from_value(json!(49.99)).unwrap();
        assert_eq!(parsed, Money::from_cents(4999));
        assert!(serde_json::from_value::<Money>(json!(-1)).is_err());
        assert_eq!(Money::from_cents(4999).to_string(), "$49.99");
    }

    #[test]
    fn listing_decodes_backend_row() {
        let row = json!({
            "id": "0b6d7b1e-4f1c-4d7e-9a51-1f0f3c1b2a01",
            "event_id": "0b6d7b1e-4f1c-4d7e-9a51-1f0f3c1b2a02",
            "seller_id": "0b6d7b1e-4f1c-4d7e-9a51-1f0f3c1b2a03",
            "price": 50,
            "original_price": null,
            "quantity": 2,
            "available_quantity": 2,
            "section": "A",
            "row_name": "12",
            "seat_numbers": ["1", "2"],
            "ticket_type": "vip",
            "status": "active",
            "images": null,
            "notes": null,
            "delivery_method": "mobile",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        });

        let listing: Listing = serde_json::from_value(row).unwrap();
        assert_eq!(listing.price, Money::from_cents(5000));
        assert_eq!(listing.row.as_deref(), Some("12"));
        assert!(listing.images.is_empty());
        assert_eq!(listing.ticket_type, TicketType::Vip);
        assert!(listing.is_purchasable());
        assert!(listing.validate_quantities().is_ok());
    }

    #[test]
    fn new_listing_uses_wire_names() {
        let payload = NewListing {
            event_id: EventId::new(),
            seller_id: UserId::new(),
            price: Money::from_cents(2500),
            original_price: None,
            quantity: 1,
            available_quantity: 1,
            section: None,
            row: Some("B".into()),
            seat_numbers: None,
            ticket_type: TicketType::General,
            delivery_method: DeliveryMethod::Electronic,
            images: vec![],
            notes: None,
            status: ListingStatus::Active,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["row_name"], json!("B"));
        assert_eq!(value["status"], json!("active"));
        assert_eq!(value["price"], json!(25.0));
    }

    proptest! {
        #[test]
        fn money_parse_matches_cents(dollars in 0u64..1_000_000, cents in 0u64..100) {
            let text = format!("{dollars}.{cents:02}");
            prop_assert_eq!(Money::parse(&text).unwrap().cents(), dollars * 100 + cents);
        }
    }
}
