//! Dependencies of the search controller.

use crate::gateway::ListingGateway;
use crate::notification::Notifier;
use std::sync::Arc;

/// Environment for [`SearchReducer`](super::SearchReducer)
pub struct SearchEnvironment<G> {
    /// Listing queries
    pub gateway: Arc<G>,
    /// Toasts
    pub notifier: Arc<dyn Notifier>,
}

impl<G: ListingGateway> SearchEnvironment<G> {
    /// Create a new environment
    #[must_use]
    pub fn new(gateway: Arc<G>, notifier: Arc<dyn Notifier>) -> Self {
        Self { gateway, notifier }
    }
}

impl<G> Clone for SearchEnvironment<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
        }
    }
}
