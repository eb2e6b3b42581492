//! Navigation targets and the protected-route guard.
//!
//! # Routes
//!
//! - `/` - redirects to the login page
//! - `/login`, `/register` - public; redirect to `/home` once signed in
//! - `/home`, `/products`, `/product/{id}`, `/cart`, `/favorites`, `/profile`
//!   - protected; anonymous visitors are sent to `/login` and returned here
//!     after signing in

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use ecoshop_core::ProductId;

use crate::auth::AuthSession;

/// Errors from route parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("No route matches {0:?}")]
    UnknownPath(String),
}

/// A page of the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Home,
    Products,
    ProductDetail(ProductId),
    Cart,
    Favorites,
    Profile,
}

impl Route {
    /// Whether the page needs a signed-in user.
    #[must_use]
    pub const fn is_protected(&self) -> bool {
        !matches!(self, Self::Root | Self::Login | Self::Register)
    }

    /// URL path for the page.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Home => "/home".to_string(),
            Self::Products => "/products".to_string(),
            Self::ProductDetail(id) => format!("/product/{id}"),
            Self::Cart => "/cart".to_string(),
            Self::Favorites => "/favorites".to_string(),
            Self::Profile => "/profile".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = RouteError;

    /// Parse a path, ignoring any query string and a trailing slash.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

        let route = match trimmed {
            "/" => Self::Root,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/home" => Self::Home,
            "/products" => Self::Products,
            "/cart" => Self::Cart,
            "/favorites" => Self::Favorites,
            "/profile" => Self::Profile,
            other => match other.strip_prefix("/product/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::ProductDetail(ProductId::new(id))
                }
                _ => return Err(RouteError::UnknownPath(s.to_owned())),
            },
        };
        Ok(route)
    }
}

/// Outcome of visiting a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the requested page.
    Allow(Route),
    /// Go to `to` instead. `from` is the page to return to after login.
    Redirect { to: Route, from: Option<Route> },
}

impl Navigation {
    /// The page that ends up displayed.
    #[must_use]
    pub const fn destination(&self) -> &Route {
        match self {
            Self::Allow(route) | Self::Redirect { to: route, .. } => route,
        }
    }
}

/// Decide what visiting `route` shows for `session`.
#[must_use]
pub fn guard(route: Route, session: &AuthSession) -> Navigation {
    let authenticated = session.is_authenticated();
    match route {
        Route::Root if authenticated => Navigation::Redirect {
            to: Route::Home,
            from: None,
        },
        Route::Root => Navigation::Redirect {
            to: Route::Login,
            from: None,
        },
        Route::Login | Route::Register if authenticated => Navigation::Redirect {
            to: Route::Home,
            from: None,
        },
        route if route.is_protected() && !authenticated => Navigation::Redirect {
            to: Route::Login,
            from: Some(route),
        },
        route => Navigation::Allow(route),
    }
}

/// Where to go after signing in: the page that redirected to login, or Home.
#[must_use]
pub fn post_login_destination(from: Option<Route>) -> Route {
    from.filter(Route::is_protected).unwrap_or(Route::Home)
}

/// Where to go after registering.
#[must_use]
pub const fn post_register_destination() -> Route {
    Route::Login
}
