use std::sync::Arc;

use storage::{PerformanceStore, Storage, StudyDaysStore};

use crate::Clock;
use crate::error::AppServicesError;
use crate::question_bank::{QuestionBank, QuestionProvider};
use crate::sessions::{PerformanceStatsService, SessionLoopService};
use crate::writing_lab_service::WritingLabService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    session_loop: Arc<SessionLoopService>,
    stats: Arc<PerformanceStatsService>,
    study_days: Arc<StudyDaysStore>,
    writing_lab: Arc<WritingLabService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage, with question generation
    /// configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::build(
            storage,
            clock,
            Arc::new(QuestionBank::from_env()),
            WritingLabService::from_env(),
        )
        .await)
    }

    /// Build services over in-memory storage and the given provider.
    pub async fn in_memory(clock: Clock, provider: Arc<dyn QuestionProvider>) -> Self {
        Self::build(
            Storage::in_memory(),
            clock,
            provider,
            WritingLabService::from_env(),
        )
        .await
    }

    async fn build(
        storage: Storage,
        clock: Clock,
        provider: Arc<dyn QuestionProvider>,
        writing_lab: WritingLabService,
    ) -> Self {
        let history = Arc::new(PerformanceStore::load(Arc::clone(&storage.kv)).await);
        let study_days = Arc::new(StudyDaysStore::load(Arc::clone(&storage.kv)).await);
        log::debug!("loaded {} past sessions", history.len().await);

        let session_loop = Arc::new(SessionLoopService::new(
            clock,
            provider,
            Arc::clone(&history),
        ));
        let stats = Arc::new(PerformanceStatsService::new(history));

        Self {
            clock,
            session_loop,
            stats,
            study_days,
            writing_lab: Arc::new(writing_lab),
        }
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<SessionLoopService> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<PerformanceStatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn study_days(&self) -> Arc<StudyDaysStore> {
        Arc::clone(&self.study_days)
    }

    #[must_use]
    pub fn writing_lab(&self) -> Arc<WritingLabService> {
        Arc::clone(&self.writing_lab)
    }
}
