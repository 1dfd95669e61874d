//! Dependencies of the sell-tickets wizard.

use crate::auth::AuthContext;
use crate::config::{AppConfig, DEFAULT_MAX_IMAGE_BYTES};
use crate::notification::Notifier;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ticketdock_core::environment::Clock;
use tokio::sync::Semaphore;

/// Size limits of a draft
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WizardLimits {
    /// Images per listing
    pub max_images: usize,
    /// Size ceiling per image
    pub max_image_bytes: u64,
    /// Upcoming events offered in the picker
    pub event_catalog_size: usize,
}

impl Default for WizardLimits {
    fn default() -> Self {
        Self {
            max_images: 5,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            event_catalog_size: 20,
        }
    }
}

impl From<&AppConfig> for WizardLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_images: config.max_images,
            max_image_bytes: config.max_image_bytes,
            ..Self::default()
        }
    }
}

/// Batches up to and including the watermark are abandoned
///
/// Uploads of an abandoned batch that have not started yet are skipped.
#[derive(Clone, Debug, Default)]
pub struct UploadCancellation(Arc<AtomicU64>);

impl UploadCancellation {
    /// Abandon every batch numbered `batch` or lower
    pub fn cancel_through(&self, batch: u64) {
        self.0.fetch_max(batch, Ordering::AcqRel);
    }

    /// Whether `batch` was abandoned
    #[must_use]
    pub fn is_cancelled(&self, batch: u64) -> bool {
        batch <= self.0.load(Ordering::Acquire)
    }
}

/// Environment for [`WizardReducer`](super::WizardReducer)
pub struct WizardEnvironment<G> {
    /// Listings, events and image storage
    pub gateway: Arc<G>,
    /// Toasts
    pub notifier: Arc<dyn Notifier>,
    /// "Now" for the event catalog and image names
    pub clock: Arc<dyn Clock>,
    /// Seller identity
    pub auth: Arc<AuthContext<G>>,
    /// Draft limits
    pub limits: WizardLimits,
    /// Bounds uploads running at once
    pub upload_permits: Arc<Semaphore>,
    /// Abandoned upload batches
    pub cancellation: UploadCancellation,
}

impl<G> WizardEnvironment<G> {
    /// Create a new environment allowing `max_concurrent_uploads` uploads at once
    #[must_use]
    pub fn new(
        gateway: Arc<G>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        auth: Arc<AuthContext<G>>,
        limits: WizardLimits,
        max_concurrent_uploads: usize,
    ) -> Self {
        Self {
            gateway,
            notifier,
            clock,
            auth,
            limits,
            upload_permits: Arc::new(Semaphore::new(max_concurrent_uploads.max(1))),
            cancellation: UploadCancellation::default(),
        }
    }
}

impl<G> Clone for WizardEnvironment<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            notifier: Arc::clone(&self.notifier),
            clock: Arc::clone(&self.clock),
            auth: Arc::clone(&self.auth),
            limits: self.limits,
            upload_permits: Arc::clone(&self.upload_permits),
            cancellation: self.cancellation.clone(),
        }
    }
}
