//! Process-wide authentication context.
//!
//! One [`AuthContext`] is created at startup, initialized once, and handed
//! to every feature that needs the signed-in user as an `Arc`. Observers
//! (route guards, the navigation bar) follow changes through
//! [`AuthContext::subscribe`].

use crate::error::GatewayError;
use crate::gateway::AuthProvider;
use crate::routing::Route;
use crate::types::UserId;
use std::sync::Arc;
use tokio::sync::watch;

/// The signed-in user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    /// User id
    pub id: UserId,
    /// Email address
    pub email: Option<String>,
    /// Display name from sign-up
    pub name: Option<String>,
}

/// Authentication state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// `init` has not finished
    #[default]
    Initializing,
    /// No session
    SignedOut,
    /// Session present
    SignedIn(CurrentUser),
}

impl AuthStatus {
    /// The user, when signed in
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::Initializing | Self::SignedOut => None,
        }
    }
}

/// Shared current-user state with an explicit lifecycle
pub struct AuthContext<P> {
    provider: Arc<P>,
    status: watch::Sender<AuthStatus>,
}

impl<P> std::fmt::Debug for AuthContext<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("status", &*self.status.borrow())
            .finish_non_exhaustive()
    }
}

impl<P: AuthProvider> AuthContext<P> {
    /// Create an uninitialized context
    #[must_use]
    pub fn new(provider: Arc<P>) -> Self {
        let (status, _) = watch::channel(AuthStatus::Initializing);
        Self { provider, status }
    }

    /// Restore the persisted session
    ///
    /// Failures are logged and treated as signed out.
    pub async fn init(&self) -> AuthStatus {
        let status = match self.provider.restore_session().await {
            Ok(Some(user)) => AuthStatus::SignedIn(user),
            Ok(None) => AuthStatus::SignedOut,
            Err(error) => {
                tracing::warn!(%error, "session restore failed; treating as signed out");
                AuthStatus::SignedOut
            },
        };
        tracing::info!(signed_in = status.user().is_some(), "auth context initialized");
        self.status.send_replace(status.clone());
        status
    }

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the status is left unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, GatewayError> {
        let user = self
            .provider
            .sign_in(email.to_string(), password.to_string())
            .await?;
        self.status.send_replace(AuthStatus::SignedIn(user.clone()));
        Ok(user)
    }

    /// Register; signed in immediately unless confirmation is pending
    ///
    /// # Errors
    ///
    /// Returns the provider's error; the status is left unchanged.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Option<CurrentUser>, GatewayError> {
        let user = self
            .provider
            .sign_up(email.to_string(), password.to_string(), name.to_string())
            .await?;
        if let Some(user) = &user {
            self.status.send_replace(AuthStatus::SignedIn(user.clone()));
        }
        Ok(user)
    }

    /// Tear down the session
    ///
    /// The local state is signed out even if the remote call fails.
    pub async fn sign_out(&self) {
        if let Err(error) = self.provider.sign_out().await {
            tracing::warn!(%error, "remote sign-out failed");
        }
        self.status.send_replace(AuthStatus::SignedOut);
    }

    /// Landing route of the auth callback: home with a session, login without
    pub async fn handle_callback(&self) -> Route {
        match self.provider.restore_session().await {
            Ok(Some(user)) => {
                self.status.send_replace(AuthStatus::SignedIn(user));
                Route::Home
            },
            Ok(None) => {
                self.status.send_replace(AuthStatus::SignedOut);
                Route::Login
            },
            Err(error) => {
                tracing::warn!(%error, "auth callback failed");
                self.status.send_replace(AuthStatus::SignedOut);
                Route::Login
            },
        }
    }

    /// Current status
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    /// Current user, if signed in
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.status.borrow().user().cloned()
    }

    /// Follow status changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }
}
