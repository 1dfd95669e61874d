//! Connection settings for the hosted backend.

use crate::error::{BackendError, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Connection settings for the hosted backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub url: Url,
    /// Public (anon) API key sent with every request
    pub anon_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Build a config from explicit values
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if `url` is not absolute, and
    /// [`BackendError::MissingConfig`] if the key is empty.
    pub fn new(url: &str, anon_key: impl Into<String>) -> Result<Self> {
        let anon_key = anon_key.into();
        if anon_key.trim().is_empty() {
            return Err(BackendError::MissingConfig("anon key"));
        }

        let mut url = Url::parse(url).map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(BackendError::InvalidUrl(url.to_string()));
        }
        // Joining relative paths needs the trailing slash
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            url,
            anon_key,
            timeout: Duration::from_secs(15),
        })
    }

    /// Load from `TICKETDOCK_BACKEND_URL`, `TICKETDOCK_ANON_KEY` and
    /// `TICKETDOCK_BACKEND_TIMEOUT_SECS` (default 15)
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingConfig`] when a required variable is unset.
    pub fn from_env() -> Result<Self> {
        let url = env::var("TICKETDOCK_BACKEND_URL")
            .map_err(|_| BackendError::MissingConfig("TICKETDOCK_BACKEND_URL"))?;
        let anon_key = env::var("TICKETDOCK_ANON_KEY")
            .map_err(|_| BackendError::MissingConfig("TICKETDOCK_ANON_KEY"))?;

        let mut config = Self::new(&url, anon_key)?;
        if let Some(secs) = env::var("TICKETDOCK_BACKEND_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Override the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve a path below the project URL
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidUrl`] if the joined URL is malformed.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_project_path() {
        let config = BackendConfig::new("https://example.test/project", "anon").unwrap();
        assert_eq!(
            config.endpoint("/rest/v1/tickets").unwrap().as_str(),
            "https://example.test/project/rest/v1/tickets"
        );
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = BackendConfig::new("https://example.test", "  ").unwrap_err();
        assert_eq!(err, BackendError::MissingConfig("anon key"));
    }

    #[test]
    fn relative_url_is_rejected() {
        assert!(matches!(
            BackendConfig::new("not a url", "anon"),
            Err(BackendError::InvalidUrl(_))
        ));
    }
}
