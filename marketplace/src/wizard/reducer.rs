//! Sell-tickets wizard reducer.

use super::actions::WizardAction;
use super::environment::WizardEnvironment;
use super::types::{BatchProgress, EventForm, ImageFile, WizardState, WizardStep};
use super::upload::object_path;
use super::validation::{build_event, build_listing, check_batch, check_forward, check_image};
use crate::error::ValidationError;
use crate::gateway::{AuthProvider, EventGateway, ImageStore, ListingGateway};
use crate::notification::{notify, Notification, Notifier};
use crate::routing::Route;
use crate::types::Event;
use std::marker::PhantomData;
use std::sync::Arc;
use ticketdock_core::{
    async_effect, effect::Effect, fire_and_forget, reducer::Reducer, smallvec, SmallVec,
};

/// Catalog fetch failed
pub const EVENTS_FAILED: &str = "Failed to load events";
/// Event insert failed
pub const CREATE_EVENT_FAILED: &str = "Failed to create event";
/// Event insert succeeded
pub const EVENT_CREATED: &str = "Event created successfully";
/// Listing insert failed
pub const SUBMIT_FAILED: &str = "Failed to create listing";
/// Listing insert succeeded
pub const SUBMITTED: &str = "Tickets listed successfully!";
/// In-flight uploads abandoned
pub const UPLOADS_CANCELLED: &str = "Upload cancelled";

type Effects = SmallVec<[Effect<WizardAction>; 4]>;

/// Reducer for the sell-tickets wizard
pub struct WizardReducer<G> {
    _gateway: PhantomData<fn() -> G>,
}

impl<G> WizardReducer<G> {
    /// Creates a new `WizardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _gateway: PhantomData,
        }
    }
}

impl<G> Default for WizardReducer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Clone for WizardReducer<G> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G> std::fmt::Debug for WizardReducer<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WizardReducer")
    }
}

fn reject(notifier: &Arc<dyn Notifier>, error: &ValidationError) -> Effects {
    tracing::debug!(%error, "wizard input rejected");
    smallvec![notify(notifier, [Notification::error(error.to_string())])]
}

impl<G> WizardReducer<G>
where
    G: ListingGateway + EventGateway + ImageStore + AuthProvider + 'static,
{
    fn load_events(state: &mut WizardState, env: &WizardEnvironment<G>) -> Effects {
        state.events_loading = true;

        let gateway = Arc::clone(&env.gateway);
        let from = env.clock.now();
        let limit = env.limits.event_catalog_size;
        smallvec![async_effect! {
            match gateway.upcoming_events(from, limit).await {
                Ok(events) => Some(WizardAction::EventsLoaded(events)),
                Err(error) => Some(WizardAction::EventsFailed(error.to_string())),
            }
        }]
    }

    /// Keep the selected event even when a refetch no longer returns it
    fn replace_catalog(state: &mut WizardState, mut events: Vec<Event>) {
        if let Some(selected) = state.selected().cloned() {
            if !events.iter().any(|event| event.id == selected.id) {
                events.insert(0, selected);
            }
        }
        state.events = events;
    }

    fn create_event(state: &mut WizardState, env: &WizardEnvironment<G>) -> Effects {
        if state.creating_event {
            return SmallVec::new();
        }
        let event = match build_event(&state.event_form) {
            Ok(event) => event,
            Err(error) => return reject(&env.notifier, &error),
        };
        state.creating_event = true;
        state.error = None;

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            match gateway.create_event(event).await {
                Ok(event) => Some(WizardAction::EventCreated(event)),
                Err(error) => Some(WizardAction::EventCreateFailed(error.to_string())),
            }
        }]
    }

    fn upload_effect(
        env: &WizardEnvironment<G>,
        batch: u64,
        file: ImageFile,
    ) -> Effect<WizardAction> {
        let path = object_path(env.clock.now(), &file, &mut rand::thread_rng());
        let gateway = Arc::clone(&env.gateway);
        let permits = Arc::clone(&env.upload_permits);
        let cancellation = env.cancellation.clone();

        async_effect! {
            let _permit = permits.acquire_owned().await.ok()?;
            if cancellation.is_cancelled(batch) {
                tracing::debug!(batch, file = %file.name, "skipping upload of abandoned batch");
                return None;
            }
            let ImageFile { name, content_type, bytes } = file;
            let result = match gateway.upload(path.clone(), bytes, content_type).await {
                Ok(()) => gateway.public_url(&path),
                Err(error) => Err(error),
            };
            match result {
                Ok(url) => Some(WizardAction::ImageUploaded { batch, file_name: name, url }),
                Err(error) => Some(WizardAction::ImageUploadFailed {
                    batch,
                    file_name: name,
                    error: error.to_string(),
                }),
            }
        }
    }

    fn add_images(
        state: &mut WizardState,
        files: Vec<ImageFile>,
        env: &WizardEnvironment<G>,
    ) -> Effects {
        if files.is_empty() {
            return SmallVec::new();
        }
        if let Err(error) = check_batch(
            state.images.len(),
            state.uploads_in_flight(),
            files.len(),
            env.limits.max_images,
        ) {
            return reject(&env.notifier, &error);
        }

        state.last_batch += 1;
        let batch = state.last_batch;

        let mut rejected = Vec::new();
        let mut uploads = Vec::new();
        for file in files {
            match check_image(&file, env.limits.max_image_bytes) {
                Ok(()) => uploads.push(Self::upload_effect(env, batch, file)),
                Err(error) => {
                    tracing::debug!(batch, %error, "image rejected");
                    rejected.push(Notification::error(error.to_string()));
                },
            }
        }

        let mut effects = Effects::new();
        if !rejected.is_empty() {
            effects.push(notify(&env.notifier, rejected));
        }
        if !uploads.is_empty() {
            tracing::debug!(batch, files = uploads.len(), "uploading images");
            state.uploads.insert(
                batch,
                BatchProgress {
                    remaining: uploads.len(),
                    uploaded: 0,
                },
            );
            effects.push(Effect::merge(uploads));
        }
        effects
    }

    /// Count one finished upload; notifies once the whole batch is done
    fn finish_upload(state: &mut WizardState, batch: u64, succeeded: bool) -> Option<Notification> {
        let progress = state.uploads.get_mut(&batch)?;
        progress.remaining = progress.remaining.saturating_sub(1);
        if succeeded {
            progress.uploaded += 1;
        }
        if progress.remaining > 0 {
            return None;
        }
        let uploaded = progress.uploaded;
        state.uploads.remove(&batch);
        tracing::debug!(batch, uploaded, images = state.images.len(), "upload batch finished");
        (uploaded > 0)
            .then(|| Notification::success(format!("{uploaded} image(s) uploaded successfully")))
    }

    fn submit(state: &mut WizardState, env: &WizardEnvironment<G>) -> Effects {
        if state.step != WizardStep::Review || state.submitting {
            tracing::debug!(step = ?state.step, submitting = state.submitting, "submit ignored");
            return SmallVec::new();
        }
        let Some(event_id) = state.selected_event else {
            return reject(&env.notifier, &ValidationError::NoEventSelected);
        };
        let Some(seller) = env.auth.current_user() else {
            return reject(&env.notifier, &ValidationError::NotSignedIn);
        };
        let listing = match build_listing(event_id, seller.id, &state.images, &state.details) {
            Ok(listing) => listing,
            Err(error) => return reject(&env.notifier, &error),
        };

        state.submitting = true;
        state.error = None;
        tracing::info!(event = %event_id, images = listing.images.len(), "submitting listing");

        let gateway = Arc::clone(&env.gateway);
        smallvec![async_effect! {
            match gateway.create_listing(listing).await {
                Ok(listing) => Some(WizardAction::Submitted(listing)),
                Err(error) => Some(WizardAction::SubmitFailed(error.to_string())),
            }
        }]
    }
}

impl<G> Reducer for WizardReducer<G>
where
    G: ListingGateway + EventGateway + ImageStore + AuthProvider + 'static,
{
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment<G>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Event selection ==========
            WizardAction::LoadEvents => Self::load_events(state, env),

            WizardAction::EventsLoaded(events) => {
                state.events_loading = false;
                tracing::debug!(events = events.len(), "event catalog loaded");
                Self::replace_catalog(state, events);
                SmallVec::new()
            },

            WizardAction::EventsFailed(error) => {
                state.events_loading = false;
                tracing::warn!(%error, "event catalog failed");
                smallvec![notify(&env.notifier, [Notification::error(EVENTS_FAILED)])]
            },

            WizardAction::SetEventSearch(text) => {
                state.event_search = text;
                SmallVec::new()
            },

            WizardAction::SelectEvent(id) => {
                if state.events.iter().any(|event| event.id == id) {
                    state.selected_event = Some(id);
                    state.show_create_form = false;
                } else {
                    tracing::warn!(event = %id, "selected event is not in the catalog");
                }
                SmallVec::new()
            },

            WizardAction::ShowCreateEventForm => {
                state.show_create_form = true;
                SmallVec::new()
            },

            WizardAction::HideCreateEventForm => {
                state.show_create_form = false;
                SmallVec::new()
            },

            WizardAction::SetEventForm(form) => {
                state.event_form = form;
                SmallVec::new()
            },

            WizardAction::CreateEvent => Self::create_event(state, env),

            WizardAction::EventCreated(event) => {
                tracing::info!(event = %event.id, "event created");
                state.creating_event = false;
                state.selected_event = Some(event.id);
                state.events.insert(0, event);
                state.event_form = EventForm::default();
                state.show_create_form = false;
                smallvec![notify(&env.notifier, [Notification::success(EVENT_CREATED)])]
            },

            WizardAction::EventCreateFailed(error) => {
                tracing::warn!(%error, "event insert failed");
                state.creating_event = false;
                state.error = Some(CREATE_EVENT_FAILED.to_string());
                smallvec![notify(&env.notifier, [Notification::error(CREATE_EVENT_FAILED)])]
            },

            // ========== Images ==========
            WizardAction::AddImages(files) => Self::add_images(state, files, env),

            WizardAction::ImageUploaded {
                batch,
                file_name,
                url,
            } => {
                if !state.uploads.contains_key(&batch) {
                    tracing::debug!(batch, file = %file_name, "ignoring upload of abandoned batch");
                    return SmallVec::new();
                }
                state.images.push(url);
                Self::finish_upload(state, batch, true)
                    .map(|done| smallvec![notify(&env.notifier, [done])])
                    .unwrap_or_default()
            },

            WizardAction::ImageUploadFailed {
                batch,
                file_name,
                error,
            } => {
                if !state.uploads.contains_key(&batch) {
                    tracing::debug!(batch, file = %file_name, "ignoring failure of abandoned batch");
                    return SmallVec::new();
                }
                tracing::warn!(batch, file = %file_name, %error, "image upload failed");
                let mut shown = vec![Notification::error(format!("Failed to upload {file_name}"))];
                shown.extend(Self::finish_upload(state, batch, false));
                smallvec![notify(&env.notifier, shown)]
            },

            WizardAction::RemoveImage(index) => {
                if index < state.images.len() {
                    state.images.remove(index);
                }
                SmallVec::new()
            },

            WizardAction::CancelUploads => {
                if state.uploads.is_empty() {
                    return SmallVec::new();
                }
                let through = state.last_batch;
                tracing::info!(
                    batches = state.uploads.len(),
                    in_flight = state.uploads_in_flight(),
                    "cancelling uploads"
                );
                state.uploads.clear();

                let cancellation = env.cancellation.clone();
                smallvec![
                    fire_and_forget! { cancellation.cancel_through(through); },
                    notify(&env.notifier, [Notification::info(UPLOADS_CANCELLED)]),
                ]
            },

            // ========== Details and navigation ==========
            WizardAction::SetDetails(details) => {
                state.details = details;
                SmallVec::new()
            },

            WizardAction::NextStep => match check_forward(state) {
                Err(error) => reject(&env.notifier, &error),
                Ok(()) => {
                    if let Some(next) = state.step.next() {
                        tracing::debug!(from = ?state.step, to = ?next, "wizard advanced");
                        state.step = next;
                    }
                    SmallVec::new()
                },
            },

            WizardAction::PreviousStep => {
                if let Some(previous) = state.step.previous() {
                    state.step = previous;
                }
                SmallVec::new()
            },

            // ========== Submission ==========
            WizardAction::Submit => Self::submit(state, env),

            WizardAction::Submitted(listing) => {
                tracing::info!(listing = %listing.id, "listing created");
                state.reset_draft();
                state.redirect = Some(Route::MyTickets);
                smallvec![notify(&env.notifier, [Notification::success(SUBMITTED)])]
            },

            WizardAction::SubmitFailed(error) => {
                tracing::warn!(%error, "listing insert failed");
                state.submitting = false;
                state.error = Some(SUBMIT_FAILED.to_string());
                smallvec![notify(&env.notifier, [Notification::error(SUBMIT_FAILED)])]
            },
        }
    }
}
