// ── Session key-value storage ──
//
// The auth service keeps its token behind this seam. The in-memory
// store serves tests and short-lived processes; `refuapp-config`
// provides a file-backed one for the CLI.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::CoreError;

/// Key under which the access token is stored.
pub const TOKEN_KEY: &str = "token";

/// A scoped, string-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, CoreError> {
        self.entries
            .lock()
            .map_err(|_| CoreError::storage("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries()?.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}
