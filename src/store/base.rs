use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::{file_store::FileStore, memory_store::MemoryStore};
use crate::config::StoreConfig;
use crate::models::Session;

/// The well-known storage key holding the serialized session.
pub const SESSION_KEY: &str = "user_data";

/// Failures writing durable storage. Reads never surface these; see [`SessionStore::load`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize storage contents: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage document at {0} is not a key/value object")]
    Corrupt(String),
}

/// Owner of the canonical persisted session.
///
/// Access is synchronous; a `save` or `clear` is visible to the next `load`
/// in the same process.
pub trait SessionStore: Send + Sync {
    /// Raw string stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Read the persisted session. Fails soft: unreadable storage, invalid JSON
    /// or a payload without an access credential all mean "no session".
    fn load(&self) -> Option<Session> {
        let raw = match self.get_item(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No persisted session under '{}'", SESSION_KEY);
                return None;
            }
            Err(e) => {
                warn!("Could not read persisted session: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unusable persisted session: {}", e);
                None
            }
        }
    }

    /// Persist `session`, replacing whatever was stored before.
    fn save(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.set_item(SESSION_KEY, raw)
    }

    /// Remove the persisted session entirely.
    fn clear(&self) -> Result<(), StorageError> {
        self.remove_item(SESSION_KEY)
    }
}

/// Creates a concrete store implementation based on the StoreConfig.
pub fn create_store(config: &StoreConfig) -> Arc<dyn SessionStore> {
    match config {
        StoreConfig::File { path } => {
            info!("Using file storage at {}", path.display());
            Arc::new(FileStore::new(path.clone()))
        }
        StoreConfig::Memory => {
            info!("Using in-memory storage; sessions will not survive a restart.");
            Arc::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(raw: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.set_item(SESSION_KEY, raw.to_string()).unwrap();
        store
    }

    #[test]
    fn test_load_is_absent_for_unusable_contents() {
        for raw in [
            "",
            "not json",
            "null",
            "42",
            "[]",
            r#"{"username": "a"}"#,
            r#"{"access": ""}"#,
            r#"{"access": 7}"#,
            r#"{"access": "tok""#,
        ] {
            assert!(store_with(raw).load().is_none(), "expected absent for {raw:?}");
        }
    }

    #[test]
    fn test_save_then_load_then_clear() {
        let store = MemoryStore::new();
        assert!(store.load().is_none());

        let session = Session::from_value(json!({"access": "tok123", "username": "a"})).unwrap();
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session.clone()));

        let newer = Session::from_value(json!({"access": "tok456"})).unwrap();
        store.save(&newer).unwrap();
        assert_eq!(store.load().unwrap().access(), "tok456");

        store.clear().unwrap();
        assert!(store.load().is_none());
        assert_eq!(store.get_item(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_create_store_memory() {
        let store = create_store(&StoreConfig::Memory);
        assert!(store.load().is_none());
    }
}
