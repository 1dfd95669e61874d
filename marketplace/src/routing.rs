//! Named routes and the auth guard in front of them.

use crate::auth::AuthStatus;
use std::fmt;

/// A page of the client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/browse`
    Browse,
    /// `/sell` (listing wizard)
    Sell,
    /// `/my-tickets`
    MyTickets,
    /// `/profile`
    Profile,
    /// `/auth/login`
    Login,
    /// `/auth/register`
    Register,
    /// `/auth/callback`
    AuthCallback,
}

impl Route {
    /// Every route
    pub const ALL: [Self; 8] = [
        Self::Home,
        Self::Browse,
        Self::Sell,
        Self::MyTickets,
        Self::Profile,
        Self::Login,
        Self::Register,
        Self::AuthCallback,
    ];

    /// URL path
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Browse => "/browse",
            Self::Sell => "/sell",
            Self::MyTickets => "/my-tickets",
            Self::Profile => "/profile",
            Self::Login => "/auth/login",
            Self::Register => "/auth/register",
            Self::AuthCallback => "/auth/callback",
        }
    }

    /// Route for a path; query string and trailing slash are ignored
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// Only signed-in users may see this route
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Sell | Self::MyTickets | Self::Profile)
    }

    /// Signed-in users are sent home from this route
    #[must_use]
    pub const fn guest_only(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// What the view layer should do for a requested route
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Show the route
    Render(Route),
    /// Go elsewhere; `return_to` is where to go back after signing in
    Redirect {
        /// Destination
        to: Route,
        /// Originally requested route
        return_to: Option<Route>,
    },
    /// Auth state not known yet; show a spinner
    Loading,
}

/// Decide whether `route` may be shown under `auth`
#[must_use]
pub fn guard(route: Route, auth: &AuthStatus) -> Navigation {
    match auth {
        AuthStatus::Initializing if route.requires_auth() || route.guest_only() => {
            Navigation::Loading
        },
        AuthStatus::SignedOut if route.requires_auth() => Navigation::Redirect {
            to: Route::Login,
            return_to: Some(route),
        },
        AuthStatus::SignedIn(_) if route.guest_only() => Navigation::Redirect {
            to: Route::Home,
            return_to: None,
        },
        _ => Navigation::Render(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CurrentUser;
    use crate::types::UserId;

    fn signed_in() -> AuthStatus {
        AuthStatus::SignedIn(CurrentUser {
            id: UserId::new(),
            email: Some("ada@example.test".into()),
            name: None,
        })
    }

    #[test]
    fn paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::parse(route.path()), Some(route));
        }
        assert_eq!(Route::parse("/sell/"), Some(Route::Sell));
        assert_eq!(Route::parse("/auth/callback?code=abc"), Some(Route::AuthCallback));
        assert_eq!(Route::parse(""), Some(Route::Home));
        assert_eq!(Route::parse("/nope"), None);
    }

    #[test]
    fn gated_route_redirects_to_login_with_return() {
        assert_eq!(
            guard(Route::MyTickets, &AuthStatus::SignedOut),
            Navigation::Redirect {
                to: Route::Login,
                return_to: Some(Route::MyTickets)
            }
        );
        assert_eq!(guard(Route::Sell, &signed_in()), Navigation::Render(Route::Sell));
    }

    #[test]
    fn guest_routes_send_signed_in_users_home() {
        assert_eq!(
            guard(Route::Register, &signed_in()),
            Navigation::Redirect {
                to: Route::Home,
                return_to: None
            }
        );
        assert_eq!(
            guard(Route::Login, &AuthStatus::SignedOut),
            Navigation::Render(Route::Login)
        );
    }

    #[test]
    fn public_routes_render_while_initializing() {
        assert_eq!(
            guard(Route::Browse, &AuthStatus::Initializing),
            Navigation::Render(Route::Browse)
        );
        assert_eq!(guard(Route::Profile, &AuthStatus::Initializing), Navigation::Loading);
    }
}
