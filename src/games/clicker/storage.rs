//! Integer key-value persistence behind a small trait.
//!
//! Values are stored as JSON numbers so the browser `localStorage` and the
//! in-memory store share one encoding.

use std::collections::BTreeMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("key-value storage is unavailable")]
    Unavailable,
    #[error("failed to encode `{key}`")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("value stored under `{key}` is not an unsigned integer")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no value stored under `{0}`")]
    Missing(String),
    #[error("storage rejected `{key}`: {reason}")]
    Rejected { key: String, reason: String },
}

/// Persisted settings storage. Keys are plain strings, values unsigned integers.
pub trait KeyValueStore {
    fn get_int(&self, key: &str) -> Result<Option<u64>, StorageError>;

    fn set_int(&mut self, key: &str, value: u64) -> Result<(), StorageError>;

    fn has_key(&self, key: &str) -> bool;

    /// Remove every key this store can see.
    fn delete_all(&mut self) -> Result<(), StorageError>;

    /// Commit pending writes. Stores that write through need not override this.
    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

fn encode(key: &str, value: u64) -> Result<String, StorageError> {
    serde_json::to_string(&value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

fn decode(key: &str, raw: &str) -> Result<u64, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Parse {
        key: key.to_string(),
        source,
    })
}

/// In-process store used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw, unvalidated value (e.g. to simulate a corrupted save).
    #[cfg(test)]
    pub fn insert_raw(&mut self, key: &str, raw: &str) {
        self.entries.insert(key.to_string(), raw.to_string());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str) -> Result<Option<u64>, StorageError> {
        self.entries
            .get(key)
            .map(|raw| decode(key, raw))
            .transpose()
    }

    fn set_int(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        let raw = encode(key, value)?;
        self.entries.insert(key.to_string(), raw);
        Ok(())
    }

    fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}

/// Browser `localStorage`. Only available on wasm32.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_int(&self, key: &str) -> Result<Option<u64>, StorageError> {
        match self.storage.get_item(key) {
            Ok(Some(raw)) => decode(key, &raw).map(Some),
            Ok(None) => Ok(None),
            Err(_) => Err(StorageError::Unavailable),
        }
    }

    fn set_int(&mut self, key: &str, value: u64) -> Result<(), StorageError> {
        let raw = encode(key, value)?;
        self.storage
            .set_item(key, &raw)
            .map_err(|e| StorageError::Rejected {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn has_key(&self, key: &str) -> bool {
        matches!(self.storage.get_item(key), Ok(Some(_)))
    }

    fn delete_all(&mut self) -> Result<(), StorageError> {
        self.storage.clear().map_err(|_| StorageError::Unavailable)
    }
}
