use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::context::SessionContext;
use crate::models::AuthResult;
use crate::routes::Location;

/// What a submission ended in.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// A session was stored; go here (replacing the form's history entry).
    Navigated(String),
    /// The request finished without a session and without anything to show.
    Stayed,
    /// The request failed; these lines are now shown on the form.
    Failed(Vec<String>),
    /// Another submission from this form was still pending.
    Ignored,
    /// The form was unmounted before the request finished; nothing was applied.
    Discarded,
}

/// Per-form submission bookkeeping: in-flight flag, mounted flag and the
/// message lines on display.
#[derive(Debug)]
pub struct SubmitState {
    in_flight: AtomicBool,
    mounted: AtomicBool,
    messages: Mutex<Vec<String>>,
}

impl Default for SubmitState {
    fn default() -> Self {
        SubmitState {
            in_flight: AtomicBool::new(false),
            mounted: AtomicBool::new(true),
            messages: Mutex::new(Vec::new()),
        }
    }
}

/// Releases the in-flight flag when the submission ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<String> {
        self.lock_messages().clone()
    }

    fn set_messages(&self, lines: Vec<String>) {
        *self.lock_messages() = lines;
    }

    fn lock_messages(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    /// Run one submission: at most one at a time, and a no-op once unmounted.
    pub async fn run<F>(
        &self,
        context: &SessionContext,
        location: &Location,
        request: F,
    ) -> FormOutcome
    where
        F: Future<Output = AuthResult>,
    {
        let Some(_in_flight) = self.begin() else {
            debug!("Submission ignored; a request is already pending");
            return FormOutcome::Ignored;
        };
        self.set_messages(Vec::new());

        let result = request.await;
        if !self.is_mounted() {
            debug!("Form unmounted before the request settled; discarding {}", result.kind());
            return FormOutcome::Discarded;
        }

        match result {
            AuthResult::Success(session) => match context.login(session) {
                Ok(()) => FormOutcome::Navigated(location.post_login_destination()),
                Err(e) => {
                    warn!("Could not persist session: {}", e);
                    let lines = vec![format!("Error: could not save session: {}", e)];
                    self.set_messages(lines.clone());
                    FormOutcome::Failed(lines)
                }
            },
            AuthResult::NotAuthenticated { .. } => FormOutcome::Stayed,
            failure => {
                let lines = failure.message_lines();
                self.set_messages(lines.clone());
                FormOutcome::Failed(lines)
            }
        }
    }
}
