//! Local key/value storage.
//!
//! Everything the portal remembers (session, theme, last tab, chat history)
//! lives behind the [`Storage`] trait as string values, JSON-encoded where
//! structured. Two backends are provided:
//!
//! - `MemoryStorage`: a plain map, used by tests and as a fallback
//! - `FileStorage`: a single `storage.json` in the data directory
//!
//! Access is single-threaded and last-write-wins; there are no transactions.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{PortalError, StorageError};

/// Key holding the JSON-encoded `Session`
pub const SESSION_KEY: &str = "session";

/// Key holding `"light"` or `"dark"`
pub const THEME_KEY: &str = "theme";

/// Key holding the identifier of the last selected dashboard tab
pub const LAST_TAB_KEY: &str = "last_tab";

/// Owner segment used for chat history when no session is readable
const ANONYMOUS_OWNER: &str = "anon";

pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Chat history key for an identifier, `chat_anon` when there is none
pub fn chat_key(owner: Option<&str>) -> String {
    format!("chat_{}", owner.unwrap_or(ANONYMOUS_OWNER))
}

/// Read and parse a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, PortalError> {
    match storage.get(key) {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| PortalError::malformed(key, &raw, e)),
        None => Ok(None),
    }
}

/// Serialize a value as JSON and store it under `key`
pub fn save_json<T: Serialize + ?Sized>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let contents = serde_json::to_string(value)?;
    storage.set(key, &contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_key() {
        assert_eq!(chat_key(Some("aluno@escola.pt")), "chat_aluno@escola.pt");
        assert_eq!(chat_key(None), "chat_anon");
    }

    #[test]
    fn test_load_json_absent_is_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<Vec<u32>> = load_json(&storage, "missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_json_malformed_is_error() {
        let mut storage = MemoryStorage::new();
        storage.set("numbers", "[1, 2,").unwrap();
        let result: Result<Option<Vec<u32>>, _> = load_json(&storage, "numbers");
        assert!(matches!(
            result,
            Err(PortalError::MalformedStoredState { ref key, .. }) if key == "numbers"
        ));
    }

    #[test]
    fn test_save_then_load_json() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "numbers", &[3u32, 1, 2]).unwrap();
        let loaded: Option<Vec<u32>> = load_json(&storage, "numbers").unwrap();
        assert_eq!(loaded, Some(vec![3, 1, 2]));
    }
}
