//! Shared application state.
//!
//! Everything a view needs to act on the session: configuration, the session
//! context, the remote API and the store behind the context.

use std::sync::Arc;

use crate::config::ConfigV1;
use crate::context::SessionContext;
use crate::forms::{LoginForm, SignupForm};
use crate::gateway::AuthApi;
use crate::routes::{Location, Navigator, RouteGuard};
use crate::store::SessionStore;

/// Application state shared by every view.
///
/// Cloning is cheap; all clones point at the same session context.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// The single in-memory session, seeded from `store`.
    pub context: Arc<SessionContext>,
    /// Login and signup requests.
    pub api: Arc<dyn AuthApi>,
    /// Durable storage owning the persisted session.
    pub store: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.context.clone())
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.guard())
    }

    pub fn login_form(&self, location: Location) -> LoginForm {
        LoginForm::new(self.api.clone(), self.context.clone(), location)
    }

    pub fn signup_form(&self, location: Location) -> SignupForm {
        SignupForm::new(self.api.clone(), self.context.clone(), location)
    }
}
