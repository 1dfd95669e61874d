//! Unit tests for `WizardReducer`.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code

use super::reducer::{CREATE_EVENT_FAILED, EVENT_CREATED, SUBMITTED};
use super::*;
use crate::auth::AuthContext;
use crate::mocks::{fixtures, InMemoryGateway, RecordingNotifier};
use crate::notification::NotificationLevel;
use crate::routing::Route;
use crate::types::{EventId, Money};
use std::collections::VecDeque;
use std::sync::Arc;
use ticketdock_core::{effect::Effect, reducer::Reducer};
use ticketdock_testing::{assertions, test_clock, ReducerTest};

struct Fixture {
    env: WizardEnvironment<InMemoryGateway>,
    notifier: Arc<RecordingNotifier>,
}

async fn build(signed_in: bool) -> Fixture {
    let gateway = Arc::new(InMemoryGateway::new());
    let auth = Arc::new(AuthContext::new(Arc::clone(&gateway)));
    gateway.register_user("seller@example.test", "hunter22", "Sam");
    if signed_in {
        auth.sign_in("seller@example.test", "hunter22").await.unwrap();
    } else {
        auth.init().await;
    }
    let notifier = Arc::new(RecordingNotifier::new());
    let env = WizardEnvironment::new(
        gateway,
        notifier.clone(),
        Arc::new(test_clock()),
        auth,
        WizardLimits::default(),
        2,
    );
    Fixture { env, notifier }
}

fn fixture(signed_in: bool) -> Fixture {
    tokio_test::block_on(build(signed_in))
}

fn test_env() -> WizardEnvironment<InMemoryGateway> {
    fixture(true).env
}

fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", name.as_bytes().to_vec())
}

/// Run effects to completion, returning the actions they feed back
async fn drain(effects: impl IntoIterator<Item = Effect<WizardAction>>) -> Vec<WizardAction> {
    let mut pending: VecDeque<_> = effects.into_iter().collect();
    let mut fed_back = Vec::new();
    while let Some(effect) = pending.pop_front() {
        match effect {
            Effect::None => {},
            Effect::Parallel(inner) | Effect::Sequential(inner) => pending.extend(inner),
            Effect::Delay { action, .. } => fed_back.push(*action),
            Effect::Future(fut) => fed_back.extend(fut.await),
        }
    }
    fed_back
}

/// A draft on the review step with everything filled in
fn review_state() -> WizardState {
    let event = fixtures::event("Jazz Night", "Music");
    let mut state = WizardState::new();
    state.selected_event = Some(event.id);
    state.events.push(event);
    state.images.push("memory://tickets/ticket-images/1-a.png".into());
    state.details.price = "80".into();
    state.details.quantity = "2".into();
    state.details.seat_numbers = "12, 13".into();
    state.step = WizardStep::Review;
    state
}

// ============================================================================
// Step guards
// ============================================================================

#[test]
fn next_step_without_event_is_refused() {
    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(WizardState::new())
        .when_action(WizardAction::NextStep)
        .then_state(|state| {
            assert_eq!(state.step, WizardStep::EventSelection);
            assert_eq!(*state, WizardState::new());
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn next_step_with_selected_event_advances() {
    let event = fixtures::event("Jazz Night", "Music");
    let id = event.id;
    let mut state = WizardState::new();
    state.events.push(event);

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_actions([WizardAction::SelectEvent(id), WizardAction::NextStep])
        .then_state(|state| assert_eq!(state.step, WizardStep::ImageUpload))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn image_step_requires_an_image() {
    let mut state = review_state();
    state.step = WizardStep::ImageUpload;
    state.images.clear();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::NextStep)
        .then_state(|state| assert_eq!(state.step, WizardStep::ImageUpload))
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn details_step_requires_positive_price() {
    for (price, expected) in [
        ("", WizardStep::Details),
        ("free", WizardStep::Details),
        ("0", WizardStep::Details),
        ("-3", WizardStep::Details),
        ("0.50", WizardStep::Review),
        ("120", WizardStep::Review),
        ("10.999", WizardStep::Review),
        ("0.001", WizardStep::Review),
        ("1e2", WizardStep::Review),
    ] {
        let mut state = review_state();
        state.step = WizardStep::Details;
        state.details.price = price.to_string();

        ReducerTest::new(WizardReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(WizardAction::NextStep)
            .then_state(move |state| assert_eq!(state.step, expected, "price {price:?}"))
            .run();
    }
}

#[test]
fn previous_step_skips_validation() {
    let mut state = review_state();
    state.details.price.clear();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_actions([
            WizardAction::PreviousStep,
            WizardAction::PreviousStep,
            WizardAction::PreviousStep,
            WizardAction::PreviousStep,
        ])
        .then_state(|state| assert_eq!(state.step, WizardStep::EventSelection))
        .then_effects(assertions::assert_no_effects)
        .run();
}

// ============================================================================
// Event selection
// ============================================================================

#[test]
fn unknown_event_is_not_selected() {
    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(WizardState::new())
        .when_action(WizardAction::SelectEvent(EventId::new()))
        .then_state(|state| assert_eq!(state.selected_event, None))
        .run();
}

#[test]
fn event_search_filters_catalog_locally() {
    let mut state = WizardState::new();
    state.events = vec![
        fixtures::event("Jazz Night", "Music"),
        fixtures::event("Derby Day", "Sports"),
    ];

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::SetEventSearch("JAZZ".into()))
        .then_state(|state| {
            let titles: Vec<_> = state.filtered_events().iter().map(|e| e.title.as_str()).collect();
            assert_eq!(titles, ["Jazz Night"]);
        })
        .run();
}

#[test]
fn load_events_fetches_catalog() {
    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(WizardState::new())
        .when_action(WizardAction::LoadEvents)
        .then_state(|state| assert!(state.events_loading))
        .then_effects(assertions::assert_has_future_effect)
        .run();
}

#[test]
fn catalog_refetch_keeps_selected_event() {
    let created = fixtures::event("Garage Show", "Music");
    let created_id = created.id;
    let mut state = WizardState::new();
    state.events.push(created);
    state.selected_event = Some(created_id);

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::EventsLoaded(vec![fixtures::event("Derby Day", "Sports")]))
        .then_state(move |state| {
            assert_eq!(state.events.len(), 2);
            assert_eq!(state.events[0].id, created_id);
            assert_eq!(state.selected_event, Some(created_id));
        })
        .run();
}

#[test]
fn create_event_requires_fields() {
    let mut state = WizardState::new();
    state.show_create_form = true;
    state.event_form.title = "Garage Show".into();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::CreateEvent)
        .then_state(|state| {
            assert!(!state.creating_event);
            assert_eq!(state.event_form.title, "Garage Show");
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn created_event_is_prepended_and_selected() {
    let existing = fixtures::event("Derby Day", "Sports");
    let created = fixtures::event("Garage Show", "Music");
    let created_id = created.id;

    let mut state = WizardState::new();
    state.events.push(existing);
    state.show_create_form = true;
    state.creating_event = true;
    state.event_form.title = "Garage Show".into();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::EventCreated(created))
        .then_state(move |state| {
            assert_eq!(state.events[0].id, created_id);
            assert_eq!(state.selected_event, Some(created_id));
            assert!(!state.show_create_form);
            assert!(!state.creating_event);
            assert_eq!(state.event_form, EventForm::default());
        })
        .run();
}

#[tokio::test]
async fn failed_event_create_keeps_form() {
    let Fixture { env, notifier } = build(true).await;
    let mut state = WizardState::new();
    state.creating_event = true;
    state.event_form.title = "Garage Show".into();

    let effects = WizardReducer::new().reduce(
        &mut state,
        WizardAction::EventCreateFailed("insert failed".into()),
        &env,
    );
    drain(effects).await;

    assert!(!state.creating_event);
    assert_eq!(state.event_form.title, "Garage Show");
    assert_eq!(notifier.errors(), vec![CREATE_EVENT_FAILED.to_string()]);
}

#[tokio::test]
async fn create_event_round_trip() {
    let Fixture { env, notifier } = build(true).await;
    let reducer = WizardReducer::new();
    let mut state = WizardState::new();
    state.event_form = EventForm {
        title: "Garage Show".into(),
        date: "2025-02-14".into(),
        location: "Austin, TX".into(),
        category: "Music".into(),
        ..EventForm::default()
    };

    let fed_back = drain(reducer.reduce(&mut state, WizardAction::CreateEvent, &env)).await;
    assert!(state.creating_event);
    let [WizardAction::EventCreated(event)] = fed_back.as_slice() else {
        panic!("expected EventCreated, got {fed_back:?}");
    };
    assert_eq!(event.country, "US");

    drain(reducer.reduce(&mut state, WizardAction::EventCreated(event.clone()), &env)).await;
    assert_eq!(state.selected_event, Some(event.id));
    assert_eq!(notifier.messages(NotificationLevel::Success), vec![EVENT_CREATED.to_string()]);
}

// ============================================================================
// Images
// ============================================================================

#[test]
fn oversized_batch_is_rejected_whole() {
    let files: Vec<_> = (0..6).map(|i| png(&format!("{i}.png"))).collect();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(WizardState::new())
        .when_action(WizardAction::AddImages(files))
        .then_state(|state| {
            assert!(state.uploads.is_empty());
            assert_eq!(state.last_batch, 0);
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn in_flight_uploads_count_against_cap() {
    let mut state = WizardState::new();
    state.images = vec!["a".into(), "b".into()];
    state.last_batch = 1;
    state.uploads.insert(
        1,
        BatchProgress {
            remaining: 2,
            uploaded: 0,
        },
    );

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::AddImages(vec![png("c.png"), png("d.png")]))
        .then_state(|state| {
            assert_eq!(state.last_batch, 1);
            assert_eq!(state.uploads_in_flight(), 2);
        })
        .run();
}

#[test]
fn invalid_file_rejected_alone() {
    let files = vec![
        png("front.png"),
        ImageFile::new("notes.txt", "text/plain", b"hi".to_vec()),
        png("back.png"),
    ];

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(WizardState::new())
        .when_action(WizardAction::AddImages(files))
        .then_state(|state| {
            assert_eq!(state.last_batch, 1);
            assert_eq!(
                state.uploads.get(&1),
                Some(&BatchProgress {
                    remaining: 2,
                    uploaded: 0
                })
            );
        })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 2);
            assert!(matches!(&effects[1], Effect::Parallel(uploads) if uploads.len() == 2));
        })
        .run();
}

#[tokio::test]
async fn batch_success_is_announced_once() {
    let Fixture { env, notifier } = build(true).await;
    let reducer = WizardReducer::new();
    let mut state = WizardState::new();

    let fed_back = drain(reducer.reduce(
        &mut state,
        WizardAction::AddImages(vec![png("front.png"), png("back.png")]),
        &env,
    ))
    .await;
    assert_eq!(fed_back.len(), 2);

    for action in fed_back {
        drain(reducer.reduce(&mut state, action, &env)).await;
    }

    assert_eq!(state.images.len(), 2);
    assert!(state.images.iter().all(|url| url.starts_with("memory://tickets/ticket-images/")));
    assert!(!state.is_uploading());
    assert_eq!(
        notifier.messages(NotificationLevel::Success),
        vec!["2 image(s) uploaded successfully".to_string()]
    );
}

#[test]
fn failed_upload_counts_toward_batch() {
    let mut state = WizardState::new();
    state.last_batch = 1;
    state.uploads.insert(
        1,
        BatchProgress {
            remaining: 2,
            uploaded: 0,
        },
    );

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_actions([
            WizardAction::ImageUploadFailed {
                batch: 1,
                file_name: "front.png".into(),
                error: "503".into(),
            },
            WizardAction::ImageUploaded {
                batch: 1,
                file_name: "back.png".into(),
                url: "memory://tickets/back.png".into(),
            },
        ])
        .then_state(|state| {
            assert_eq!(state.images, vec!["memory://tickets/back.png".to_string()]);
            assert!(state.uploads.is_empty());
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn cancelled_batch_completions_are_ignored() {
    let mut state = WizardState::new();
    state.last_batch = 1;
    state.uploads.insert(
        1,
        BatchProgress {
            remaining: 1,
            uploaded: 0,
        },
    );

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_actions([
            WizardAction::CancelUploads,
            WizardAction::ImageUploaded {
                batch: 1,
                file_name: "late.png".into(),
                url: "memory://tickets/late.png".into(),
            },
        ])
        .then_state(|state| {
            assert!(state.images.is_empty());
            assert!(!state.is_uploading());
        })
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn remove_image_by_index() {
    let mut state = WizardState::new();
    state.images = vec!["a".into(), "b".into(), "c".into()];

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_actions([WizardAction::RemoveImage(1), WizardAction::RemoveImage(9)])
        .then_state(|state| assert_eq!(state.images, vec!["a".to_string(), "c".to_string()]))
        .run();
}

// ============================================================================
// Submission
// ============================================================================

#[test]
fn submit_outside_review_is_ignored() {
    let mut state = review_state();
    state.step = WizardStep::Details;

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::Submit)
        .then_state(|state| assert!(!state.submitting))
        .then_effects(assertions::assert_no_effects)
        .run();
}

#[test]
fn submit_requires_signed_in_seller() {
    ReducerTest::new(WizardReducer::new())
        .with_env(fixture(false).env)
        .given_state(review_state())
        .when_action(WizardAction::Submit)
        .then_state(|state| assert!(!state.submitting))
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[test]
fn submit_rejects_bad_quantity() {
    let mut state = review_state();
    state.details.quantity = "two".into();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::Submit)
        .then_state(|state| assert!(!state.submitting))
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}

#[tokio::test]
async fn submit_creates_listing_and_redirects() {
    let Fixture { env, notifier } = build(true).await;
    let reducer = WizardReducer::new();
    let mut state = review_state();
    let events = state.events.clone();

    let fed_back = drain(reducer.reduce(&mut state, WizardAction::Submit, &env)).await;
    assert!(state.submitting);

    let [WizardAction::Submitted(listing)] = fed_back.as_slice() else {
        panic!("expected Submitted, got {fed_back:?}");
    };
    assert_eq!(listing.price, Money::from_cents(8000));
    assert_eq!(listing.available_quantity, 2);
    assert_eq!(listing.seat_numbers, Some(vec!["12".to_string(), "13".to_string()]));
    assert_eq!(env.gateway.listings().len(), 1);

    drain(reducer.reduce(&mut state, WizardAction::Submitted(listing.clone()), &env)).await;
    assert_eq!(state.redirect, Some(Route::MyTickets));
    assert_eq!(state.step, WizardStep::EventSelection);
    assert_eq!(state.selected_event, None);
    assert!(state.images.is_empty());
    assert_eq!(state.events, events);
    assert_eq!(notifier.messages(NotificationLevel::Success), vec![SUBMITTED.to_string()]);
}

#[test]
fn submit_failure_keeps_draft() {
    let mut state = review_state();
    state.submitting = true;
    let draft = state.details.clone();

    ReducerTest::new(WizardReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(WizardAction::SubmitFailed("insert failed".into()))
        .then_state(move |state| {
            assert!(!state.submitting);
            assert_eq!(state.step, WizardStep::Review);
            assert_eq!(state.details, draft);
            assert_eq!(state.redirect, None);
        })
        .then_effects(|effects| assertions::assert_effects_count(effects, 1))
        .run();
}
