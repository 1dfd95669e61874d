//! State types for the sell-tickets wizard.

use crate::routing::Route;
use crate::types::{DeliveryMethod, Event, EventId, TicketType};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Wizard step, in order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    /// Pick or create the event
    #[default]
    EventSelection,
    /// Upload ticket photos
    ImageUpload,
    /// Price, quantity, seats
    Details,
    /// Confirm and submit
    Review,
}

impl WizardStep {
    /// 1-based position, as shown in the progress bar
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::EventSelection => 1,
            Self::ImageUpload => 2,
            Self::Details => 3,
            Self::Review => 4,
        }
    }

    /// Following step; `None` on review
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::EventSelection => Some(Self::ImageUpload),
            Self::ImageUpload => Some(Self::Details),
            Self::Details => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// Preceding step; `None` on event selection
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::EventSelection => None,
            Self::ImageUpload => Some(Self::EventSelection),
            Self::Details => Some(Self::ImageUpload),
            Self::Review => Some(Self::Details),
        }
    }

    /// Heading of the step
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::EventSelection => "Select Event",
            Self::ImageUpload => "Upload Images",
            Self::Details => "Ticket Details",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}

/// Text fields of the details step, as typed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailsForm {
    /// Asking price
    pub price: String,
    /// Face value, optional
    pub original_price: String,
    /// Number of tickets
    pub quantity: String,
    /// Section, optional
    pub section: String,
    /// Row, optional
    pub row: String,
    /// Comma separated seat numbers, optional
    pub seat_numbers: String,
    /// Ticket kind
    pub ticket_type: TicketType,
    /// Delivery method
    pub delivery_method: DeliveryMethod,
    /// Notes to buyers, optional
    pub notes: String,
}

impl Default for DetailsForm {
    fn default() -> Self {
        Self {
            price: String::new(),
            original_price: String::new(),
            quantity: "1".to_string(),
            section: String::new(),
            row: String::new(),
            seat_numbers: String::new(),
            ticket_type: TicketType::General,
            delivery_method: DeliveryMethod::Electronic,
            notes: String::new(),
        }
    }
}

/// Fields of the create-event form, as typed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventForm {
    /// Required
    pub title: String,
    /// Optional
    pub description: String,
    /// Required; RFC 3339, `YYYY-MM-DDTHH:MM` or `YYYY-MM-DD` (UTC)
    pub date: String,
    /// Required
    pub location: String,
    /// Required
    pub category: String,
    /// Optional
    pub venue: String,
    /// Optional
    pub city: String,
    /// Optional
    pub state: String,
}

/// A file picked or dropped by the user
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    /// File name
    pub name: String,
    /// Declared MIME type
    pub content_type: String,
    /// Contents
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    /// Create a file from its parts
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Outstanding uploads of one batch
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchProgress {
    /// Uploads not yet finished
    pub remaining: usize,
    /// Uploads that succeeded so far
    pub uploaded: usize,
}

/// State of the sell-tickets wizard
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WizardState {
    /// Current step
    pub step: WizardStep,

    /// Candidate events, soonest first; created events are prepended
    pub events: Vec<Event>,
    /// The catalog is being fetched
    pub events_loading: bool,
    /// Local filter over the catalog
    pub event_search: String,
    /// Event the listing is for
    pub selected_event: Option<EventId>,

    /// The create-event form is open
    pub show_create_form: bool,
    /// Create-event form contents
    pub event_form: EventForm,
    /// A create-event call is outstanding
    pub creating_event: bool,

    /// Public URLs of uploaded images, in completion order
    pub images: Vec<String>,
    /// Batches with uploads in flight, by batch number
    pub uploads: BTreeMap<u64, BatchProgress>,
    /// Number of the last batch started
    pub last_batch: u64,

    /// Details form contents
    pub details: DetailsForm,
    /// The create-listing call is outstanding
    pub submitting: bool,
    /// Message of the last failure
    pub error: Option<String>,
    /// Set once the listing is created; the view navigates there
    pub redirect: Option<Route>,
}

impl WizardState {
    /// Fresh wizard on step one
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog entries matching `event_search` by title or location
    #[must_use]
    pub fn filtered_events(&self) -> Vec<&Event> {
        let needle = self.event_search.trim().to_lowercase();
        self.events
            .iter()
            .filter(|event| {
                needle.is_empty()
                    || event.title.to_lowercase().contains(&needle)
                    || event.location.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// The selected event, if it is in the catalog
    #[must_use]
    pub fn selected(&self) -> Option<&Event> {
        let id = self.selected_event?;
        self.events.iter().find(|event| event.id == id)
    }

    /// Uploads still in flight across all batches
    #[must_use]
    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.values().map(|batch| batch.remaining).sum()
    }

    /// Any upload is in flight
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        !self.uploads.is_empty()
    }

    /// Forget the draft, keeping the loaded catalog
    ///
    /// Batch numbering continues, so completions of old batches stay ignored.
    pub fn reset_draft(&mut self) {
        *self = Self {
            events: std::mem::take(&mut self.events),
            last_batch: self.last_batch,
            ..Self::default()
        };
    }
}
