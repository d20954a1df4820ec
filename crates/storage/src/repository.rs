use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key holding the whole performance log.
pub const PERFORMANCE_HISTORY_KEY: &str = "performanceHistory";

/// Key holding the set of completed study-plan days.
pub const COMPLETED_STUDY_DAYS_KEY: &str = "completedStudyDays";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Whole-value key-value persistence.
///
/// `put` overwrites the entire value stored under `key`; there are no
/// partial or incremental updates.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value, falling back to `T::default()`.
///
/// Missing keys, backend failures and unparseable payloads all count as
/// "nothing stored yet"; failures are logged and never surfaced.
pub(crate) async fn read_json_or_default<T>(kv: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match kv.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            log::warn!("failed to read {key}, using empty default: {err}");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        log::warn!("stored {key} is unreadable, using empty default: {err}");
        T::default()
    })
}

/// Encode `value` as JSON and overwrite `key` with it.
pub(crate) async fn write_json<T>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
{
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    kv.put(key, &raw).await
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage backend behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            kv: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_overwrites_whole_value() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get("k").await.unwrap(), None);

        repo.put("k", "[1,2,3]").await.unwrap();
        repo.put("k", "[4]").await.unwrap();

        assert_eq!(repo.get("k").await.unwrap().as_deref(), Some("[4]"));
    }

    #[tokio::test]
    async fn corrupt_json_reads_as_default() {
        let repo = InMemoryRepository::new();
        repo.put("k", "{not json").await.unwrap();

        let value: Vec<u32> = read_json_or_default(&repo, "k").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn json_helpers_round_trip() {
        let repo = InMemoryRepository::new();
        write_json(&repo, "k", &vec![7_u32, 8]).await.unwrap();

        let value: Vec<u32> = read_json_or_default(&repo, "k").await;
        assert_eq!(value, vec![7, 8]);
    }
}
