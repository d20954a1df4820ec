#![forbid(unsafe_code)]

pub mod performance;
pub mod repository;
pub mod sqlite;
pub mod study_days;

pub use performance::PerformanceStore;
pub use repository::{InMemoryRepository, KeyValueStore, Storage, StorageError};
pub use study_days::StudyDaysStore;
