//! Account reducer.

use super::environment::AccountEnvironment;
use super::types::{AccountAction, AccountState};
use crate::gateway::{AuthProvider, ListingGateway, ProfileGateway};
use crate::notification::{notify, Notification};
use crate::routing::Route;
use std::marker::PhantomData;
use std::sync::Arc;
use ticketdock_core::{async_effect, effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Profile fetch failed
pub const PROFILE_FAILED: &str = "Failed to load profile";
/// Listings fetch failed
pub const LISTINGS_FAILED: &str = "Failed to load your tickets";

/// Reducer for the account pages
pub struct AccountReducer<G> {
    _gateway: PhantomData<fn() -> G>,
}

impl<G> AccountReducer<G> {
    /// Creates a new `AccountReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _gateway: PhantomData,
        }
    }
}

impl<G> Default for AccountReducer<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> Clone for AccountReducer<G> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<G> Reducer for AccountReducer<G>
where
    G: ProfileGateway + ListingGateway + AuthProvider + 'static,
{
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AccountEnvironment<G>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            AccountAction::Load => {
                let Some(user) = env.auth.current_user() else {
                    tracing::debug!("account load without a user");
                    state.redirect = Some(Route::Login);
                    return SmallVec::new();
                };
                state.loading_profile = true;
                state.loading_listings = true;
                state.error = None;

                let profiles = Arc::clone(&env.gateway);
                let listings = Arc::clone(&env.gateway);
                let id = user.id;
                smallvec![Effect::merge(vec![
                    async_effect! {
                        match profiles.profile(id).await {
                            Ok(profile) => Some(AccountAction::ProfileLoaded(profile)),
                            Err(error) => Some(AccountAction::ProfileFailed(error.to_string())),
                        }
                    },
                    async_effect! {
                        match listings.listings_by_seller(id).await {
                            Ok(rows) => Some(AccountAction::ListingsLoaded(rows)),
                            Err(error) => Some(AccountAction::ListingsFailed(error.to_string())),
                        }
                    },
                ])]
            },

            AccountAction::ProfileLoaded(profile) => {
                state.loading_profile = false;
                state.profile = Some(profile);
                SmallVec::new()
            },

            AccountAction::ProfileFailed(error) => {
                tracing::warn!(%error, "profile fetch failed");
                state.loading_profile = false;
                state.error = Some(PROFILE_FAILED.to_string());
                smallvec![notify(&env.notifier, [Notification::error(PROFILE_FAILED)])]
            },

            AccountAction::ListingsLoaded(rows) => {
                tracing::debug!(listings = rows.len(), "seller listings loaded");
                state.loading_listings = false;
                state.listings = rows;
                SmallVec::new()
            },

            AccountAction::ListingsFailed(error) => {
                tracing::warn!(%error, "seller listings fetch failed");
                state.loading_listings = false;
                state.error = Some(LISTINGS_FAILED.to_string());
                smallvec![notify(&env.notifier, [Notification::error(LISTINGS_FAILED)])]
            },

            AccountAction::SignOut => {
                if state.signing_out {
                    return SmallVec::new();
                }
                state.signing_out = true;

                let auth = Arc::clone(&env.auth);
                smallvec![async_effect! {
                    auth.sign_out().await;
                    Some(AccountAction::SignedOut)
                }]
            },

            AccountAction::SignedOut => {
                tracing::info!("signed out");
                *state = AccountState {
                    redirect: Some(Route::Home),
                    ..AccountState::default()
                };
                SmallVec::new()
            },
        }
    }
}
