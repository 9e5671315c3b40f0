use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Value can not be encoded as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Stored value for {key} is not valid JSON: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence of small string values
///
/// Typed values are stored as JSON through [`KeyValueStore::set`] and
/// [`KeyValueStore::get`].
pub trait KeyValueStore {
    /// Stores raw string under `key`, replacing previous value
    fn set_raw(&mut self, key: &str, value: String);

    /// Returns raw string stored under `key`
    fn get_raw(&self, key: &str) -> Option<String>;

    /// Removes `key`, no-op when it is absent
    fn remove(&mut self, key: &str);

    /// Stores `value` encoded as JSON
    fn set<T>(&mut self, key: &str, value: &T) -> Result<(), StorageError>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        self.set_raw(key, serde_json::to_string(value)?);
        Ok(())
    }

    /// Returns decoded JSON value, `None` when nothing or an empty string is stored
    fn get<T>(&self, key: &str) -> Result<Option<T>, StorageError>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        match self.get_raw(key) {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Decode {
                    key: key.to_owned(),
                    source,
                }),
            _ => Ok(None),
        }
    }
}

/// In-memory [`KeyValueStore`]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn set_raw(&mut self, key: &str, value: String) {
        self.items.insert(key.to_owned(), value);
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}
