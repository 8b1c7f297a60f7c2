use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::gateway::AuthApi;
use crate::models::AuthResult;
use crate::store::{MemoryStore, SessionStore, StorageError};

/// An [`AuthApi`] answering every call with a fixed result, optionally held
/// back until [`ScriptedApi::release`] is called.
pub(crate) struct ScriptedApi {
    result: AuthResult,
    gated: bool,
    gate: Notify,
    calls: AtomicUsize,
}

impl ScriptedApi {
    pub(crate) fn answering(result: AuthResult) -> Self {
        ScriptedApi {
            result,
            gated: false,
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn gated(result: AuthResult) -> Self {
        ScriptedApi {
            gated: true,
            ..Self::answering(result)
        }
    }

    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn answer(&self) -> AuthResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.gated {
            self.gate.notified().await;
        }
        self.result.clone()
    }
}

#[async_trait]
impl AuthApi for ScriptedApi {
    async fn login(&self, _identifier: &str, _secret: &str) -> AuthResult {
        self.answer().await
    }

    async fn signup(&self, _name: &str, _email: &str, _secret: &str) -> AuthResult {
        self.answer().await
    }
}

/// Storage that counts writes and can be told to fail them.
#[derive(Default)]
pub(crate) struct RecordingStore {
    inner: MemoryStore,
    pub(crate) writes: AtomicUsize,
    fail_writes: bool,
}

impl RecordingStore {
    pub(crate) fn failing() -> Self {
        RecordingStore {
            fail_writes: true,
            ..Default::default()
        }
    }
}

impl SessionStore for RecordingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            )));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key)
    }
}
