use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field holding the access credential in every session payload.
pub const ACCESS_FIELD: &str = "access";
/// Field holding the optional refresh credential.
pub const REFRESH_FIELD: &str = "refresh";

/// Reasons a JSON value cannot become a [`Session`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session payload is not a JSON object")]
    NotAnObject,
    #[error("session payload has no access credential")]
    MissingAccess,
    #[error("session access credential is empty")]
    EmptyAccess,
}

/// An authenticated visitor.
///
/// The payload returned by the API is kept verbatim (field order included) so
/// that what gets persisted is exactly what the server sent. Construction is
/// checked: a `Session` always carries a non-empty access credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Session {
    access: String,
    payload: Map<String, Value>,
}

impl Session {
    /// Build a session from an API payload, rejecting anything without a usable
    /// access credential.
    pub fn from_value(value: Value) -> Result<Self, SessionError> {
        let Value::Object(payload) = value else {
            return Err(SessionError::NotAnObject);
        };

        let access = match payload.get(ACCESS_FIELD) {
            Some(Value::String(access)) if access.is_empty() => {
                return Err(SessionError::EmptyAccess)
            }
            Some(Value::String(access)) => access.clone(),
            _ => return Err(SessionError::MissingAccess),
        };

        Ok(Session { access, payload })
    }

    /// The opaque access credential.
    pub fn access(&self) -> &str {
        &self.access
    }

    /// The refresh credential, if the API returned one as a string.
    pub fn refresh(&self) -> Option<&str> {
        self.payload.get(REFRESH_FIELD).and_then(Value::as_str)
    }

    /// Any other field of the payload (profile data).
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.payload.get(field)
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}

impl TryFrom<Value> for Session {
    type Error = SessionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Session::from_value(value)
    }
}

impl From<Session> for Value {
    fn from(session: Session) -> Self {
        Value::Object(session.payload)
    }
}
