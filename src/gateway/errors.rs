//! Turning the API's failure shapes into an [`AuthResult`].
//!
//! Error bodies from the API map field names to lists of messages, e.g.
//! `{"username": ["This field may not be blank."]}`. Each field becomes one
//! display line, in the order the fields appear in the body.

use serde_json::Value;
use tracing::debug;

use crate::models::auth_result::{AuthResult, UNKNOWN_FAILURE_LINE};

/// Classify the body of a non-2xx response.
///
/// An empty body means the server never really answered and is reported as a
/// network failure.
pub fn classify_error_body(body: &str) -> AuthResult {
    if body.trim().is_empty() {
        return AuthResult::NetworkFailure;
    }

    let fields = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => fields,
        Ok(other) => {
            debug!("Error body is JSON but not an object: {}", other);
            return AuthResult::UnknownFailure(UNKNOWN_FAILURE_LINE.to_string());
        }
        Err(e) => {
            debug!("Error body is not JSON: {}", e);
            return AuthResult::UnknownFailure(UNKNOWN_FAILURE_LINE.to_string());
        }
    };

    let lines: Vec<String> = fields
        .iter()
        .filter_map(|(field, messages)| {
            let line = field_line(messages);
            if line.is_none() {
                debug!("Skipping unrecognized error entry for field '{}'", field);
            }
            line
        })
        .collect();

    if lines.is_empty() {
        AuthResult::UnknownFailure(UNKNOWN_FAILURE_LINE.to_string())
    } else {
        AuthResult::ValidationFailure(lines)
    }
}

/// One display line for a field: its messages joined by a space.
fn field_line(messages: &Value) -> Option<String> {
    match messages {
        Value::Array(items) if !items.is_empty() => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::String(message) if !message.is_empty() => Some(message.clone()),
        _ => None,
    }
}

/// Classify an error raised by the HTTP client itself.
pub fn classify_transport_error(error: &reqwest::Error) -> AuthResult {
    if error.is_connect() || error.is_timeout() || error.is_request() || error.is_body() {
        AuthResult::NetworkFailure
    } else {
        AuthResult::UnknownFailure(format!("Error: {}", error))
    }
}
