//! Password authentication and session handling

use crate::{
    client::{decode, request_failed, BackendClient},
    error::{BackendError, Result},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// User record as returned by the auth service
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthUser {
    /// User id (a UUID string)
    pub id: String,
    /// Email address, if the account has one
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form metadata supplied at sign-up (`name`, ...)
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    /// Display name from sign-up metadata
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.user_metadata.get("name").and_then(Value::as_str)
    }
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    /// Bearer token for table and storage requests
    pub access_token: String,
    /// Token used to obtain a new access token
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Signed-in user
    pub user: AuthUser,
}

impl BackendClient {
    /// Sign in with email and password; the session is kept for later calls
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` or `BackendError::ApiError` for
    /// rejected credentials, and transport/parse errors otherwise.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.config.endpoint("auth/v1/token")?;
        let response = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(request_failed)?;

        let session = match decode::<Session>(response).await {
            Ok(session) => session,
            // The token endpoint reports bad credentials as 400
            Err(BackendError::ApiError { status: 400, message }) => {
                return Err(BackendError::Unauthorized(message));
            },
            Err(error) => return Err(error),
        };

        tracing::info!(user_id = %session.user.id, "signed in");
        self.set_session(Some(session.clone())).await;
        Ok(session)
    }

    /// Register a new account
    ///
    /// Returns the session when the project signs users in immediately, or
    /// `None` when an email confirmation is pending.
    ///
    /// # Errors
    ///
    /// Returns errors for network failures, API errors, or parsing failures
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<Option<Session>> {
        let url = self.config.endpoint("auth/v1/signup")?;
        let response = self
            .http
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password, "data": metadata }))
            .send()
            .await
            .map_err(request_failed)?;

        let body = decode::<Value>(response).await?;
        if body.get("access_token").is_none() {
            tracing::info!("sign-up pending confirmation");
            return Ok(None);
        }

        let session: Session = serde_json::from_value(body)
            .map_err(|e| BackendError::ResponseParseFailed(e.to_string()))?;
        self.set_session(Some(session.clone())).await;
        Ok(Some(session))
    }

    /// Fetch the user behind the current session
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Unauthorized` when there is no session or the
    /// token was rejected.
    pub async fn get_user(&self) -> Result<AuthUser> {
        if self.session.read().await.is_none() {
            return Err(BackendError::Unauthorized("no session".to_string()));
        }

        let url = self.config.endpoint("auth/v1/user")?;
        let request = self.authorized(self.http.get(url)).await;
        let response = request.send().await.map_err(request_failed)?;
        decode::<AuthUser>(response).await
    }

    /// Revoke the current session
    ///
    /// The local session is cleared even if the remote call fails.
    ///
    /// # Errors
    ///
    /// Returns the remote error after the session has been cleared.
    pub async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.session.write().await.take() else {
            return Ok(());
        };

        let url = self.config.endpoint("auth/v1/logout")?;
        let response = self
            .http
            .post(url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await
            .map_err(request_failed)?;

        if response.status().is_success() {
            tracing::info!(user_id = %session.user.id, "signed out");
            Ok(())
        } else {
            decode::<Value>(response).await.map(|_| ())
        }
    }

    /// Current session, if signed in
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Replace the current session (e.g. restoring a persisted one)
    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }
}
