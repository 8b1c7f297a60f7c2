//! Client-side navigation.
//!
//! This module holds the route table of the application, the guard deciding
//! whether a protected destination may render, and the navigator applying
//! those decisions.

pub mod guard;
pub mod navigator;

pub use guard::{GuardDecision, RouteGuard};
pub use navigator::{Navigation, Navigator};

/// Landing page (place listing).
pub const HOME_ROUTE: &str = "/";
pub const LOGIN_ROUTE: &str = "/auth/login/";
pub const SIGNUP_ROUTE: &str = "/auth/create/";

/// Every view the application can render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Places,
    Login,
    Signup,
    PlaceDetail(String),
    NotFound,
}

impl Route {
    /// Match a path against the route table. Query and fragment are ignored,
    /// a trailing slash is optional and unmatched paths are `NotFound`.
    pub fn resolve(path: &str) -> Route {
        let path = pathname(path);
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Route::Places,
            ["auth", "login"] => Route::Login,
            ["auth", "create"] => Route::Signup,
            ["place", id] => Route::PlaceDetail((*id).to_string()),
            _ => Route::NotFound,
        }
    }

    /// Only views behind the guard require a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::PlaceDetail(_))
    }

    pub fn path(&self) -> Option<String> {
        match self {
            Route::Places => Some(HOME_ROUTE.to_string()),
            Route::Login => Some(LOGIN_ROUTE.to_string()),
            Route::Signup => Some(SIGNUP_ROUTE.to_string()),
            Route::PlaceDetail(id) => Some(format!("/place/{}", id)),
            Route::NotFound => None,
        }
    }
}

/// `path` without its query string or fragment.
fn pathname(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// A navigation target plus the state carried along with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    /// The destination originally requested before a redirect to login.
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Location {
            path: path.into(),
            from: None,
        }
    }

    pub fn with_from(path: impl Into<String>, from: impl Into<String>) -> Self {
        Location {
            path: path.into(),
            from: Some(from.into()),
        }
    }

    pub fn route(&self) -> Route {
        Route::resolve(&self.path)
    }

    pub fn pathname(&self) -> &str {
        pathname(&self.path)
    }

    /// Where a successful login or signup from this location should go.
    pub fn post_login_destination(&self) -> String {
        self.from.clone().unwrap_or_else(|| HOME_ROUTE.to_string())
    }
}
