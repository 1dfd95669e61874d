//! Configuration management for the marketplace client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Only the backend URL and key are required.

use std::env;
use thiserror::Error;
use ticketdock_backend::{BackendConfig, BackendError};

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required variable is unset or empty
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// Backend settings were rejected
    #[error("Invalid backend configuration: {0}")]
    Backend(#[from] BackendError),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Backend project URL (`TICKETDOCK_BACKEND_URL`)
    pub backend_url: String,
    /// Public API key (`TICKETDOCK_ANON_KEY`)
    pub anon_key: String,
    /// Object store bucket for listing images (default: `tickets`)
    pub storage_bucket: String,
    /// Search page size (default: 10)
    pub page_size: usize,
    /// Images per listing (default: 5)
    pub max_images: usize,
    /// Size ceiling per image in bytes (default: 5 MiB)
    pub max_image_bytes: u64,
    /// Uploads running at once (default: 4)
    pub max_concurrent_uploads: usize,
    /// Default log filter when `RUST_LOG` is unset (default: `info`)
    pub log_level: String,
}

/// Default image size ceiling: 5 MiB
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the backend URL or key is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unparseable numbers fall back to their defaults; counts are at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the backend URL or key is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            backend_url: required("TICKETDOCK_BACKEND_URL")?,
            anon_key: required("TICKETDOCK_ANON_KEY")?,
            storage_bucket: lookup("TICKETDOCK_STORAGE_BUCKET")
                .unwrap_or_else(|| "tickets".to_string()),
            page_size: lookup("TICKETDOCK_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10usize)
                .max(1),
            max_images: lookup("TICKETDOCK_MAX_IMAGES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5usize)
                .max(1),
            max_image_bytes: lookup("TICKETDOCK_MAX_IMAGE_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_BYTES),
            max_concurrent_uploads: lookup("TICKETDOCK_MAX_CONCURRENT_UPLOADS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(4usize)
                .max(1),
            log_level: lookup("TICKETDOCK_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Connection settings for the backend client
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Backend`] if the URL or key is rejected.
    pub fn backend(&self) -> Result<BackendConfig, ConfigError> {
        Ok(BackendConfig::new(&self.backend_url, self.anon_key.clone())?)
    }
}
