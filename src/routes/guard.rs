use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Location, Route, LOGIN_ROUTE};
use crate::context::{SessionAction, SessionContext, SessionState};

/// What to do with a navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Show the view.
    Render(Route),
    /// The session has not been rehydrated yet; decide later.
    Defer,
    /// Go to login instead, remembering where the visitor wanted to go.
    Redirect(Location),
}

/// Decides per navigation whether a protected view may render.
///
/// Nothing is cached between calls: every evaluation reads the session
/// context afresh, so a logout anywhere in the application is honored on the
/// next protected navigation.
#[derive(Clone)]
pub struct RouteGuard {
    context: Arc<SessionContext>,
}

impl RouteGuard {
    pub fn new(context: Arc<SessionContext>) -> Self {
        RouteGuard { context }
    }

    pub fn evaluate(&self, location: &Location) -> GuardDecision {
        let route = location.route();
        if !route.is_protected() {
            return GuardDecision::Render(route);
        }

        match self.context.current() {
            SessionState::Initializing => {
                debug!("Deferring '{}' until the session is loaded", location.path);
                GuardDecision::Defer
            }
            SessionState::Authenticated(_) => GuardDecision::Render(route),
            SessionState::Unauthenticated => {
                info!("'{}' requires login; redirecting", location.path);
                // An entry that cannot be cleared never blocks the redirect.
                if let Err(e) = self.context.dispatch(SessionAction::Logout) {
                    warn!("Could not clear stale session entry: {}", e);
                }
                GuardDecision::Redirect(Location::with_from(LOGIN_ROUTE, location.pathname()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::routes::{Navigation, Navigator};
    use crate::store::{FileStore, MemoryStore, SessionStore, SESSION_KEY};
    use serde_json::json;

    fn session() -> Session {
        Session::from_value(json!({"access": "tok"})).unwrap()
    }

    #[test]
    fn test_public_routes_render_without_session() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        let guard = RouteGuard::new(ctx);

        for path in ["/", "/auth/login/", "/auth/create/", "/does/not/exist"] {
            let decision = guard.evaluate(&Location::new(path));
            assert!(matches!(decision, GuardDecision::Render(_)), "{path}");
        }
    }

    #[test]
    fn test_protected_route_defers_while_initializing() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        let guard = RouteGuard::new(ctx);

        assert_eq!(
            guard.evaluate(&Location::new("/place/42")),
            GuardDecision::Defer
        );
    }

    #[test]
    fn test_redirect_carries_origin() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        ctx.bootstrap();
        let guard = RouteGuard::new(ctx);

        assert_eq!(
            guard.evaluate(&Location::new("/place/42")),
            GuardDecision::Redirect(Location::with_from(LOGIN_ROUTE, "/place/42"))
        );
    }

    #[test]
    fn test_redirect_clears_stale_storage() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_item(SESSION_KEY, r#"{"access": ""}"#.to_string())
            .unwrap();
        let ctx = SessionContext::new(store.clone());
        ctx.bootstrap();

        let decision = RouteGuard::new(ctx).evaluate(&Location::new("/place/1"));
        assert!(matches!(decision, GuardDecision::Redirect(_)));
        assert_eq!(store.get_item(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_elsewhere_is_honored_on_next_navigation() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        ctx.bootstrap();
        ctx.login(session()).unwrap();
        let guard = RouteGuard::new(ctx.clone());

        let place = Location::new("/place/7");
        assert_eq!(
            guard.evaluate(&place),
            GuardDecision::Render(Route::PlaceDetail("7".into()))
        );

        ctx.logout().unwrap();
        assert!(matches!(
            guard.evaluate(&place),
            GuardDecision::Redirect(_)
        ));
    }

    #[test]
    fn test_redirect_drops_query_and_fragment_from_origin() {
        let ctx = SessionContext::new(Arc::new(MemoryStore::new()));
        ctx.bootstrap();

        assert_eq!(
            RouteGuard::new(ctx).evaluate(&Location::new("/place/42?tab=map#photos")),
            GuardDecision::Redirect(Location::with_from(LOGIN_ROUTE, "/place/42"))
        );
    }

    #[test]
    fn test_corrupt_storage_still_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "garbage{").unwrap();
        let ctx = SessionContext::new(Arc::new(FileStore::new(&path)));
        assert_eq!(ctx.bootstrap(), SessionState::Unauthenticated);

        let mut navigator = Navigator::new(RouteGuard::new(ctx));
        assert_eq!(
            navigator.navigate("/place/42"),
            Navigation::Redirected(Location::with_from(LOGIN_ROUTE, "/place/42"))
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage{");
    }
}
