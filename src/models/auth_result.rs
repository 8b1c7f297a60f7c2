use super::session::Session;

/// Line shown when the connection to the API failed.
pub const NETWORK_FAILURE_LINE: &str = "Check network connection.";
/// Line shown when an error body carried nothing we could attribute to a field.
pub const UNKNOWN_FAILURE_LINE: &str = "An unknown error occurred.";

/// Outcome of a login or signup attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResult {
    /// The API issued a session.
    Success(Session),
    /// The API rejected the input; one display line per offending field, in the
    /// order the fields appeared in the response body.
    ValidationFailure(Vec<String>),
    /// The API could not be reached or dropped the connection.
    NetworkFailure,
    /// Anything else, carrying the line to display.
    UnknownFailure(String),
    /// Signup answered 2xx but with a status code other than the one that means
    /// "account created and logged in". No session, no navigation.
    NotAuthenticated { status_code: Option<i64> },
}

impl AuthResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AuthResult::Success(_))
    }

    /// Short tag used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthResult::Success(_) => "success",
            AuthResult::ValidationFailure(_) => "validation",
            AuthResult::NetworkFailure => "network",
            AuthResult::UnknownFailure(_) => "unknown",
            AuthResult::NotAuthenticated { .. } => "not-authenticated",
        }
    }

    /// The lines a form renders for this outcome.
    pub fn message_lines(&self) -> Vec<String> {
        match self {
            AuthResult::ValidationFailure(lines) => lines.clone(),
            AuthResult::NetworkFailure => vec![NETWORK_FAILURE_LINE.to_string()],
            AuthResult::UnknownFailure(message) => vec![message.clone()],
            AuthResult::Success(_) | AuthResult::NotAuthenticated { .. } => Vec::new(),
        }
    }
}
