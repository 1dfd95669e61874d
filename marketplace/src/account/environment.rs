//! Dependencies of the account pages.

use crate::auth::AuthContext;
use crate::notification::Notifier;
use std::sync::Arc;

/// Environment for [`AccountReducer`](super::AccountReducer)
pub struct AccountEnvironment<G> {
    /// Profiles and listings
    pub gateway: Arc<G>,
    /// Toasts
    pub notifier: Arc<dyn Notifier>,
    /// Current user and sign-out
    pub auth: Arc<AuthContext<G>>,
}

impl<G> AccountEnvironment<G> {
    /// Create a new environment
    #[must_use]
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>, auth: Arc<AuthContext<G>>) -> Self {
        Self {
            gateway,
            notifier,
            auth,
        }
    }
}

impl<G> Clone for AccountEnvironment<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
            auth: Arc::clone(&self.auth),
        }
    }
}
