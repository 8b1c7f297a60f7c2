use tracing::debug;

use super::guard::{GuardDecision, RouteGuard};
use super::{Location, Route, HOME_ROUTE};

/// Result of a navigation request.
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Rendered(Route),
    /// Waiting for the session bootstrap; call [`Navigator::resume`] afterwards.
    Pending,
    /// Sent to login; the location carries the requested path in `from`.
    Redirected(Location),
}

/// Browser-like history driven through the [`RouteGuard`].
pub struct Navigator {
    guard: RouteGuard,
    history: Vec<Location>,
    pending: Option<(Location, bool)>,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        Navigator {
            guard,
            history: vec![Location::new(HOME_ROUTE)],
            pending: None,
        }
    }

    pub fn current(&self) -> &Location {
        // history always holds at least the initial entry
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Location] {
        &self.history
    }

    /// Where a login completed at the current location should lead.
    pub fn post_login_destination(&self) -> String {
        self.current().post_login_destination()
    }

    /// Push a new entry for `path`.
    pub fn navigate(&mut self, path: &str) -> Navigation {
        self.go(Location::new(path), false)
    }

    /// Replace the current entry with `location`.
    pub fn replace(&mut self, location: Location) -> Navigation {
        self.go(location, true)
    }

    /// Re-run a deferred navigation once the session is known.
    pub fn resume(&mut self) -> Option<Navigation> {
        let (location, replace) = self.pending.take()?;
        Some(self.go(location, replace))
    }

    fn go(&mut self, location: Location, replace: bool) -> Navigation {
        match self.guard.evaluate(&location) {
            GuardDecision::Render(route) => {
                debug!("Rendering {:?} at '{}'", route, location.path);
                self.pending = None;
                self.record(location, replace);
                Navigation::Rendered(route)
            }
            GuardDecision::Defer => {
                self.pending = Some((location, replace));
                Navigation::Pending
            }
            GuardDecision::Redirect(login) => {
                self.pending = None;
                // the redirect stands in for the requested entry
                self.record(login.clone(), replace);
                Navigation::Redirected(login)
            }
        }
    }

    fn record(&mut self, location: Location, replace: bool) {
        if replace {
            self.history.pop();
        }
        self.history.push(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SessionContext;
    use crate::models::Session;
    use crate::routes::LOGIN_ROUTE;
    use crate::store::{MemoryStore, SessionStore};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_pending_navigation_resumes_after_bootstrap() {
        let store = Arc::new(MemoryStore::new());
        store
            .save(&Session::from_value(json!({"access": "tok"})).unwrap())
            .unwrap();
        let ctx = SessionContext::new(store);
        let mut nav = Navigator::new(RouteGuard::new(ctx.clone()));

        assert_eq!(nav.navigate("/place/3"), Navigation::Pending);
        assert_eq!(nav.current().path, "/");

        ctx.bootstrap();
        assert_eq!(
            nav.resume(),
            Some(Navigation::Rendered(Route::PlaceDetail("3".into())))
        );
        assert_eq!(nav.current().path, "/place/3");
        assert_eq!(nav.resume(), None);
    }

    #[test]
    fn test_redirect_then_replace_returns_to_origin() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        ctx.bootstrap();
        let mut nav = Navigator::new(RouteGuard::new(ctx.clone()));

        let Navigation::Redirected(login) = nav.navigate("/place/42") else {
            panic!("expected a redirect");
        };
        assert_eq!(login.path, LOGIN_ROUTE);
        assert_eq!(nav.current(), &login);

        ctx.login(Session::from_value(json!({"access": "tok"})).unwrap())
            .unwrap();
        let destination = nav.post_login_destination();
        assert_eq!(destination, "/place/42");
        assert_eq!(
            nav.replace(Location::new(destination)),
            Navigation::Rendered(Route::PlaceDetail("42".into()))
        );
        let paths: Vec<&str> = nav.history().iter().map(|l| l.path.as_str()).collect();
        assert_eq!(paths, vec!["/", "/place/42"]);
    }

    #[test]
    fn test_unknown_path_renders_not_found() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        let mut nav = Navigator::new(RouteGuard::new(ctx));
        assert_eq!(
            nav.navigate("/nope"),
            Navigation::Rendered(Route::NotFound)
        );
    }
}
