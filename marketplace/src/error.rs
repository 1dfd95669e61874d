//! Error types for the marketplace client.
//!
//! Reducers never return these. Remote failures ([`GatewayError`]) and
//! user-correctable input problems ([`ValidationError`]) are turned into
//! state plus a notification at the call site.

use thiserror::Error;
use ticketdock_backend::BackendError;

/// Failure of a Data Gateway call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Transport or backend failure
    #[error("Backend request failed: {0}")]
    Remote(String),

    /// The backend answered with data we could not interpret
    #[error("Unexpected backend data: {0}")]
    Decode(String),

    /// No signed-in user, or the session was rejected
    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<BackendError> for GatewayError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Unauthorized(message) => Self::Unauthorized(message),
            BackendError::ResponseParseFailed(message) => Self::Decode(message),
            BackendError::EmptyInsert { table } => {
                Self::Decode(format!("insert into {table} returned no row"))
            },
            other => Self::Remote(other.to_string()),
        }
    }
}

/// User-correctable input problems; the display text is what the user sees
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Step 1 guard
    #[error("Please select an event")]
    NoEventSelected,

    /// Step 2 guard
    #[error("Please upload at least one image")]
    NoImages,

    /// Step 3 guard: price missing, not a number, or not positive
    #[error("Please enter a valid price")]
    InvalidPrice,

    /// Original price present but not a valid amount
    #[error("Please enter a valid original price")]
    InvalidOriginalPrice,

    /// Quantity is not a whole number of at least 1
    #[error("Quantity must be a whole number of at least 1")]
    InvalidQuantity,

    /// Create-event form is missing title, date, location or category
    #[error("Please fill in all required fields")]
    MissingEventFields,

    /// Create-event date could not be parsed
    #[error("Please enter a valid event date")]
    InvalidEventDate,

    /// Accepting the batch would exceed the image cap
    #[error("Maximum {max} images allowed")]
    TooManyImages {
        /// Configured cap
        max: usize,
    },

    /// Declared content type is not `image/*`
    #[error("{file} is not an image file")]
    NotAnImage {
        /// File name as selected
        file: String,
    },

    /// File exceeds the size ceiling
    #[error("{file} is too large. Maximum size is {max_mib}MB")]
    FileTooLarge {
        /// File name as selected
        file: String,
        /// Ceiling in MiB
        max_mib: u64,
    },

    /// `available_quantity` exceeds `quantity`
    #[error("Available quantity {available} exceeds quantity {quantity}")]
    QuantityExceeded {
        /// Remaining tickets
        available: u32,
        /// Total tickets
        quantity: u32,
    },

    /// Text is not a money amount
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Selling requires a signed-in seller
    #[error("You must be signed in to list tickets")]
    NotSignedIn,
}
