//! Object storage: upload by path and public URLs

use crate::{
    client::{decode, request_failed, BackendClient},
    error::{BackendError, Result},
};
use serde_json::Value;
use url::Url;

/// Cache lifetime sent with every upload (seconds)
pub const UPLOAD_CACHE_SECONDS: u32 = 3600;

impl BackendClient {
    /// Upload `bytes` to `bucket/path`
    ///
    /// Existing objects are never overwritten (`x-upsert: false`), so a
    /// name collision surfaces as an API error.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures or API errors.
    pub async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let url = self
            .config
            .endpoint(&format!("storage/v1/object/{bucket}/{path}"))?;
        let size = bytes.len();
        let request = self
            .http
            .post(url)
            .header("content-type", content_type)
            .header("cache-control", format!("max-age={UPLOAD_CACHE_SECONDS}"))
            .header("x-upsert", "false")
            .body(bytes);

        let response = self.authorized(request).await.send().await.map_err(request_failed)?;
        decode::<Value>(response).await?;

        tracing::debug!(bucket, path, size, "uploaded object");
        Ok(())
    }

    /// Public URL of an object in a public bucket
    ///
    /// # Errors
    ///
    /// Returns `BackendError::InvalidUrl` if the path cannot be joined.
    pub fn public_url(&self, bucket: &str, path: &str) -> Result<Url> {
        if path.is_empty() {
            return Err(BackendError::InvalidUrl("empty object path".to_string()));
        }
        self.config
            .endpoint(&format!("storage/v1/object/public/{bucket}/{path}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::{BackendClient, BackendConfig};

    #[test]
    fn public_url_points_at_public_object() {
        let client =
            BackendClient::new(BackendConfig::new("https://example.test", "anon").unwrap()).unwrap();
        let url = client
            .public_url("tickets", "ticket-images/1700000000000-abc123.png")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/storage/v1/object/public/tickets/ticket-images/1700000000000-abc123.png"
        );
    }

    #[test]
    fn empty_path_is_rejected() {
        let client =
            BackendClient::new(BackendConfig::new("https://example.test", "anon").unwrap()).unwrap();
        assert!(client.public_url("tickets", "").is_err());
    }
}
