use std::sync::Arc;

use prep_core::model::PerformanceRecord;
use tokio::sync::Mutex;

use crate::repository::{
    KeyValueStore, PERFORMANCE_HISTORY_KEY, StorageError, read_json_or_default, write_json,
};

/// Newest-first log of completed sessions.
///
/// The log is read once when the store is loaded and written back whole on
/// every append. Appends are serialized, so the persisted value always
/// matches the in-memory log after the most recent successful write.
pub struct PerformanceStore {
    kv: Arc<dyn KeyValueStore>,
    records: Mutex<Vec<PerformanceRecord>>,
}

impl PerformanceStore {
    /// Load the persisted log; absent or unreadable data yields an empty log.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let records: Vec<PerformanceRecord> =
            read_json_or_default(kv.as_ref(), PERFORMANCE_HISTORY_KEY).await;
        log::debug!("loaded {} performance records", records.len());
        Self {
            kv,
            records: Mutex::new(records),
        }
    }

    /// The full log, newest first.
    pub async fn load_all(&self) -> Vec<PerformanceRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Prepend `record` and persist the whole log.
    ///
    /// The in-memory append always takes effect; a failed persist is
    /// reported but does not remove the record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the log cannot be serialized or written.
    pub async fn append(&self, record: PerformanceRecord) -> Result<(), StorageError> {
        let mut records = self.records.lock().await;
        log::debug!("appending performance record {}", record.id());
        records.insert(0, record);

        if let Err(err) = write_json(self.kv.as_ref(), PERFORMANCE_HISTORY_KEY, &*records).await {
            log::warn!("performance log persist failed: {err}");
            return Err(err);
        }
        Ok(())
    }
}
