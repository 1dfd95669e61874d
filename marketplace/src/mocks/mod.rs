//! Test doubles for the Data Gateway and notifier
//!
//! Used by this crate's tests and by the integration tests; they also let
//! the features run without a backend.

pub mod fixtures;
mod gateway;
mod notifier;

pub use gateway::{InMemoryGateway, Operation};
pub use notifier::RecordingNotifier;
