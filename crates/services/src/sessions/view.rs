use chrono::{DateTime, Utc};
use std::sync::Arc;

use prep_core::model::{PerformanceRecord, RecordId, SessionKind};
use prep_core::stats::{self, OverallStats, SubjectAccuracy};
use storage::PerformanceStore;

/// Presentation-agnostic list item for a finished session.
///
/// No pre-formatted strings; the caller formats timestamps and percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceListItem {
    pub id: RecordId,
    pub completed_at: DateTime<Utc>,
    pub kind: SessionKind,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
}

impl PerformanceListItem {
    #[must_use]
    pub fn from_record(record: &PerformanceRecord) -> Self {
        Self {
            id: record.id(),
            completed_at: record.completed_at(),
            kind: record.kind().clone(),
            score: record.score(),
            total: record.total(),
            percentage: record.percentage(),
        }
    }
}

/// Read-only statistics over the performance history.
///
/// Every call recomputes from the current log; nothing is cached.
#[derive(Clone)]
pub struct PerformanceStatsService {
    history: Arc<PerformanceStore>,
}

impl PerformanceStatsService {
    #[must_use]
    pub fn new(history: Arc<PerformanceStore>) -> Self {
        Self { history }
    }

    /// Totals and average accuracy across every recorded session.
    pub async fn overview(&self) -> OverallStats {
        stats::overall_stats(&self.history.load_all().await)
    }

    /// Accuracy over every recorded answer, in percent.
    pub async fn overall_accuracy(&self) -> f64 {
        stats::overall_accuracy(&self.history.load_all().await)
    }

    /// Per-subject accuracy, best subject first.
    pub async fn subject_breakdown(&self) -> Vec<SubjectAccuracy> {
        stats::per_subject_accuracy(&self.history.load_all().await)
    }

    /// Most recent sessions first, at most `limit` of them.
    pub async fn recent(&self, limit: usize) -> Vec<PerformanceListItem> {
        self.history
            .load_all()
            .await
            .iter()
            .take(limit)
            .map(PerformanceListItem::from_record)
            .collect()
    }

    /// Full record for review, if it exists.
    pub async fn record(&self, id: RecordId) -> Option<PerformanceRecord> {
        self.history
            .load_all()
            .await
            .into_iter()
            .find(|record| record.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::{Answer, Question, QuestionId};
    use prep_core::time::fixed_now;
    use storage::Storage;

    fn record(subject: &str, correct: usize, total: usize) -> PerformanceRecord {
        let questions: Vec<Question> = (0..total)
            .map(|i| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Q{i}"),
                    ["A", "B", "C", "D"].map(String::from),
                    "A",
                    subject,
                )
                .unwrap()
            })
            .collect();
        let answers = questions
            .iter()
            .enumerate()
            .map(|(i, q)| Answer::grade(q, if i < correct { "A" } else { "B" }))
            .collect();
        PerformanceRecord::from_session(
            RecordId::generate(),
            fixed_now(),
            SessionKind::FocusQuiz {
                subject: subject.to_string(),
            },
            questions,
            answers,
        )
        .unwrap()
    }

    async fn service_with(records: Vec<PerformanceRecord>) -> PerformanceStatsService {
        let store = PerformanceStore::load(Storage::in_memory().kv).await;
        for record in records {
            store.append(record).await.unwrap();
        }
        PerformanceStatsService::new(Arc::new(store))
    }

    #[tokio::test]
    async fn empty_history_reports_zeroes() {
        let service = service_with(Vec::new()).await;
        assert_eq!(service.overview().await, OverallStats::default());
        assert_eq!(service.overall_accuracy().await, 0.0);
        assert!(service.subject_breakdown().await.is_empty());
        assert!(service.recent(5).await.is_empty());
    }

    #[tokio::test]
    async fn recent_lists_newest_first_and_honours_limit() {
        let older = record("History", 1, 2);
        let newer = record("Physics", 2, 2);
        let newer_id = newer.id();
        let service = service_with(vec![older, newer]).await;

        let items = service.recent(1).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, newer_id);
        assert_eq!(items[0].percentage, 100.0);
        assert_eq!(service.recent(10).await.len(), 2);
    }

    #[tokio::test]
    async fn record_lookup_by_id() {
        let wanted = record("Chemistry", 0, 1);
        let id = wanted.id();
        let service = service_with(vec![wanted.clone(), record("History", 1, 1)]).await;

        assert_eq!(service.record(id).await, Some(wanted));
        assert_eq!(service.record(RecordId::generate()).await, None);
    }

    #[tokio::test]
    async fn overview_sums_every_record() {
        let service = service_with(vec![record("History", 2, 3), record("Mathematics", 3, 5)]).await;
        let overview = service.overview().await;
        assert_eq!(overview.total_questions, 8);
        assert_eq!(overview.total_correct, 5);
        assert_eq!(overview.average, 62.5);
    }
}
