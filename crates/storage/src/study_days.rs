use std::sync::Arc;

use prep_core::model::CompletedStudyDays;
use tokio::sync::Mutex;

use crate::repository::{
    COMPLETED_STUDY_DAYS_KEY, KeyValueStore, StorageError, read_json_or_default, write_json,
};

/// Persisted set of completed study-plan days.
pub struct StudyDaysStore {
    kv: Arc<dyn KeyValueStore>,
    days: Mutex<CompletedStudyDays>,
}

impl StudyDaysStore {
    /// Load the persisted set; absent or unreadable data yields an empty set.
    pub async fn load(kv: Arc<dyn KeyValueStore>) -> Self {
        let days: CompletedStudyDays =
            read_json_or_default(kv.as_ref(), COMPLETED_STUDY_DAYS_KEY).await;
        Self {
            kv,
            days: Mutex::new(days),
        }
    }

    pub async fn days(&self) -> CompletedStudyDays {
        self.days.lock().await.clone()
    }

    /// Flip `day_id` and persist; returns whether the day is now completed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the set cannot be written. The in-memory
    /// toggle is kept either way.
    pub async fn toggle(&self, day_id: u32) -> Result<bool, StorageError> {
        let mut days = self.days.lock().await;
        let completed = days.toggle(day_id);
        write_json(self.kv.as_ref(), COMPLETED_STUDY_DAYS_KEY, &*days).await?;
        Ok(completed)
    }
}
