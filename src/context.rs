//! The shared in-memory session.
//!
//! One [`SessionContext`] exists per application. It starts out
//! [`SessionState::Initializing`], rehydrates from the [`SessionStore`] exactly
//! once, and afterwards changes only through [`SessionContext::dispatch`].
//! Every consumer holds the same instance and can subscribe to changes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::models::Session;
use crate::store::{SessionStore, StorageError};

/// What the application currently knows about the visitor.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Persisted state has not been read yet; route decisions must wait.
    Initializing,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionState {
    pub fn is_initializing(&self) -> bool {
        matches!(self, SessionState::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

impl From<Option<Session>> for SessionState {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Unauthenticated,
        }
    }
}

/// Updates accepted by [`SessionContext::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Replace the in-memory session. Does not persist.
    Login(Session),
    /// Forget the session in memory and in durable storage.
    Logout,
}

pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
    bootstrapped: AtomicBool,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Initializing);
        Arc::new(SessionContext {
            store,
            state,
            bootstrapped: AtomicBool::new(false),
        })
    }

    /// Read the persisted session once and leave the `Initializing` state.
    ///
    /// Later calls do not touch storage again and just return the current state.
    /// A dispatch that happened before the first bootstrap wins over what was on disk.
    pub fn bootstrap(&self) -> SessionState {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return self.current();
        }

        let loaded = SessionState::from(self.store.load());
        info!(
            authenticated = loaded.is_authenticated(),
            "Session bootstrap complete"
        );
        self.state.send_if_modified(|state| {
            if state.is_initializing() {
                *state = loaded;
                true
            } else {
                false
            }
        });
        self.current()
    }

    /// Apply an update and broadcast it to every subscriber.
    pub fn dispatch(&self, action: SessionAction) -> Result<(), StorageError> {
        match action {
            SessionAction::Login(session) => {
                debug!("Dispatching LOGIN");
                self.state.send_replace(SessionState::Authenticated(session));
                Ok(())
            }
            SessionAction::Logout => {
                debug!("Dispatching LOGOUT");
                self.state.send_replace(SessionState::Unauthenticated);
                self.store.clear()
            }
        }
    }

    /// Persist `session` and then make it current.
    pub fn login(&self, session: Session) -> Result<(), StorageError> {
        self.store.save(&session)?;
        self.dispatch(SessionAction::Login(session))
    }

    pub fn logout(&self) -> Result<(), StorageError> {
        self.dispatch(SessionAction::Logout)
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolves once bootstrap (or a dispatch) has left `Initializing`.
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        let ready = rx.wait_for(|state| !state.is_initializing()).await;
        match ready {
            Ok(state) => state.clone(),
            Err(_) => self.current(),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}
