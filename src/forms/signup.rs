use std::sync::Arc;

use super::submit::{FormOutcome, SubmitState};
use crate::context::SessionContext;
use crate::gateway::AuthApi;
use crate::routes::Location;

/// The signup form: name, email and password. A successful signup logs the
/// visitor in straight away.
pub struct SignupForm {
    api: Arc<dyn AuthApi>,
    context: Arc<SessionContext>,
    location: Location,
    state: SubmitState,
}

impl SignupForm {
    pub fn new(api: Arc<dyn AuthApi>, context: Arc<SessionContext>, location: Location) -> Self {
        SignupForm {
            api,
            context,
            location,
            state: SubmitState::default(),
        }
    }

    pub async fn submit(&self, name: &str, email: &str, password: &str) -> FormOutcome {
        self.state
            .run(
                &self.context,
                &self.location,
                self.api.signup(name, email, password),
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
