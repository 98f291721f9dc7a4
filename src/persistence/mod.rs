//! Key-value persistence
//!
//! Backends:
//! - `MemoryStorage`: process-local map (tests, fallback)
//! - `JsonFileStorage`: one JSON object on disk, written via tmp + rename (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)
//!
//! Callers decide how to recover from a `StoreError`; nothing here panics.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Why a read or write did not go through
#[derive(Debug)]
pub enum StoreError {
    /// No storage available (private browsing, no window, ...)
    Unavailable(String),
    Io(std::io::Error),
    /// Stored data could not be decoded
    Corrupt(serde_json::Error),
    /// The backend refused the operation (quota, security policy)
    Rejected(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(why) => write!(f, "storage unavailable: {why}"),
            StoreError::Io(err) => write!(f, "storage I/O error: {err}"),
            StoreError::Corrupt(err) => write!(f, "stored data is corrupt: {err}"),
            StoreError::Rejected(why) => write!(f, "storage rejected the write: {why}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::Corrupt(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Corrupt(err)
    }
}

/// Minimal durable string map
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_roundtrip() {
        let mut store = MemoryStorage::new();
        assert!(store.is_empty());
        assert_eq!(store.get("missing").unwrap(), None);
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::Unavailable("no window".into());
        assert_eq!(err.to_string(), "storage unavailable: no window");
    }
}
