//! Sell-tickets wizard.
//!
//! Four steps, strictly in order: pick (or create) the event, upload
//! ticket photos, fill in the details, review and submit. Moving forward
//! is guarded by the current step's check; moving back never is.
//!
//! Image uploads run as independent effects, bounded by a semaphore, and
//! land in the draft in completion order. A failed upload only affects
//! its own file.

pub mod actions;
pub mod environment;
pub mod reducer;
#[cfg(test)]
mod tests;
pub mod types;
pub mod upload;
pub mod validation;

pub use actions::WizardAction;
pub use environment::{UploadCancellation, WizardEnvironment, WizardLimits};
pub use reducer::WizardReducer;
pub use types::{BatchProgress, DetailsForm, EventForm, ImageFile, WizardState, WizardStep};
pub use validation::parse_seat_numbers;
