//! Actions of the sell-tickets wizard.

use super::types::{DetailsForm, EventForm, ImageFile};
use crate::types::{Event, EventId, Listing};

/// Wizard actions
///
/// Past-tense variants are results of remote calls fed back by effects.
#[derive(Clone, Debug)]
pub enum WizardAction {
    // Event selection
    /// Fetch upcoming events for the picker
    LoadEvents,
    /// Catalog fetched
    EventsLoaded(Vec<Event>),
    /// Catalog fetch failed
    EventsFailed(String),
    /// Filter the picker locally
    SetEventSearch(String),
    /// Pick a catalog event
    SelectEvent(EventId),
    /// Open the create-event form
    ShowCreateEventForm,
    /// Close the create-event form
    HideCreateEventForm,
    /// Replace the create-event form contents
    SetEventForm(EventForm),
    /// Validate the form and create the event
    CreateEvent,
    /// Event stored
    EventCreated(Event),
    /// Event could not be stored
    EventCreateFailed(String),

    // Images
    /// Files picked or dropped
    AddImages(Vec<ImageFile>),
    /// One upload finished
    ImageUploaded {
        /// Batch the file belonged to
        batch: u64,
        /// File name as selected
        file_name: String,
        /// Public URL of the stored object
        url: String,
    },
    /// One upload failed
    ImageUploadFailed {
        /// Batch the file belonged to
        batch: u64,
        /// File name as selected
        file_name: String,
        /// Error description, for logs
        error: String,
    },
    /// Drop an uploaded image by position
    RemoveImage(usize),
    /// Abandon uploads in flight
    CancelUploads,

    // Details and navigation
    /// Replace the details form contents
    SetDetails(DetailsForm),
    /// Advance if the current step's guard passes
    NextStep,
    /// Go back one step, without validation
    PreviousStep,

    // Submission
    /// Create the listing (review step only)
    Submit,
    /// Listing stored
    Submitted(Listing),
    /// Listing could not be stored
    SubmitFailed(String),
}
