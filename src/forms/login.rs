use std::sync::Arc;

use super::submit::{FormOutcome, SubmitState};
use crate::context::SessionContext;
use crate::gateway::AuthApi;
use crate::routes::Location;

/// The login form: username (an email address) and password.
pub struct LoginForm {
    api: Arc<dyn AuthApi>,
    context: Arc<SessionContext>,
    location: Location,
    state: SubmitState,
}

impl LoginForm {
    /// `location` is where the form is shown; its `from` decides where a
    /// successful login goes.
    pub fn new(api: Arc<dyn AuthApi>, context: Arc<SessionContext>, location: Location) -> Self {
        LoginForm {
            api,
            context,
            location,
            state: SubmitState::default(),
        }
    }

    pub async fn submit(&self, username: &str, password: &str) -> FormOutcome {
        self.state
            .run(
                &self.context,
                &self.location,
                self.api.login(username, password),
            )
            .await
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.messages()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting()
    }

    pub fn unmount(&self) {
        self.state.unmount();
    }
}
