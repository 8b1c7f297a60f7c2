//! Application startup.
//!
//! Builds the store, the session context and the API gateway from the
//! configuration, then rehydrates the session before anything is shown.

use std::sync::Arc;

use tracing::info;

use crate::config::ConfigV1;
use crate::context::{SessionContext, SessionState};
use crate::gateway::{AuthApi, HttpAuthGateway};
use crate::state::AppState;
use crate::store::create_store;

/// Wires the application together. The session context is left `Initializing`.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built (e.g. TLS backend
/// initialization failed).
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, reqwest::Error> {
    let store = create_store(&config.store);
    let context = SessionContext::new(store.clone());
    let api: Arc<dyn AuthApi> = Arc::new(HttpAuthGateway::new(&config.api)?);

    Ok(AppState {
        config,
        context,
        api,
        store,
    })
}

/// Builds the state and performs the one-time session bootstrap.
pub fn start(config: Arc<ConfigV1>) -> Result<(AppState, SessionState), reqwest::Error> {
    let state = build_state(config)?;
    let session = state.context.bootstrap();
    info!(
        authenticated = session.is_authenticated(),
        "Application ready"
    );
    Ok((state, session))
}
