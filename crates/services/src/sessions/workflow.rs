use std::sync::Arc;

use prep_core::model::{Answer, PerformanceRecord, RecordId, SessionKind};
use storage::PerformanceStore;

use super::service::{SessionEngine, SessionOutcome, SessionState, Transition};
use crate::Clock;
use crate::error::SessionError;
use crate::question_bank::QuestionProvider;

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub answer: Answer,
    pub is_complete: bool,
    /// The record appended to the history when this answer finished the session.
    pub record: Option<PerformanceRecord>,
    /// `false` when the record was appended but could not be persisted.
    pub persisted: bool,
}

/// Orchestrates session start, answering and recording.
#[derive(Clone)]
pub struct SessionLoopService {
    clock: Clock,
    provider: Arc<dyn QuestionProvider>,
    history: Arc<PerformanceStore>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        provider: Arc<dyn QuestionProvider>,
        history: Arc<PerformanceStore>,
    ) -> Self {
        Self {
            clock,
            provider,
            history,
        }
    }

    /// Ask the provider for questions and start a session over them.
    ///
    /// An empty question sequence still starts a session, in `SessionState::Empty`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generation` if the provider fails; retrying is safe.
    pub async fn start(&self, kind: SessionKind) -> Result<SessionEngine, SessionError> {
        let questions = self.provider.generate(&kind).await?;
        log::info!("starting {} with {} questions", kind.title(), questions.len());
        Ok(SessionEngine::new(kind, questions, self.clock.now()))
    }

    /// Record the pending selection and, on the last question, append the
    /// finished session to the history.
    ///
    /// A failed persist is logged and reported through `persisted`; the record
    /// stays in the in-memory history either way.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingSelected` when no option is pending,
    /// `SessionError::Completed` or `SessionError::Empty` for terminal sessions,
    /// and `SessionError::Record` if the outcome cannot form a record.
    pub async fn advance(
        &self,
        session: &mut SessionEngine,
    ) -> Result<SessionAnswerResult, SessionError> {
        match session.advance() {
            Transition::Next => Ok(SessionAnswerResult {
                answer: last_answer(session)?,
                is_complete: false,
                record: None,
                persisted: false,
            }),
            Transition::Finished(outcome) => {
                let answer = last_answer(session)?;
                let (record, persisted) = self.record(outcome).await?;
                Ok(SessionAnswerResult {
                    answer,
                    is_complete: true,
                    record: Some(record),
                    persisted,
                })
            }
            Transition::Rejected | Transition::Selected => Err(match session.state() {
                SessionState::Finished => SessionError::Completed,
                SessionState::Empty => SessionError::Empty,
                SessionState::AwaitingSelection | SessionState::Selected => {
                    SessionError::NothingSelected
                }
            }),
        }
    }

    /// Abandon a session without recording anything.
    pub fn exit(&self, session: SessionEngine) {
        session.exit();
    }

    async fn record(
        &self,
        outcome: SessionOutcome,
    ) -> Result<(PerformanceRecord, bool), SessionError> {
        let record = PerformanceRecord::from_session(
            RecordId::generate(),
            self.clock.now(),
            outcome.kind,
            outcome.questions,
            outcome.answers,
        )?;
        log::info!(
            "finished {}: {}/{}",
            record.kind().title(),
            record.score(),
            record.total()
        );

        let persisted = match self.history.append(record.clone()).await {
            Ok(()) => true,
            Err(err) => {
                log::warn!("session {} kept in memory only: {err}", record.id());
                false
            }
        };
        Ok((record, persisted))
    }
}

fn last_answer(session: &SessionEngine) -> Result<Answer, SessionError> {
    session
        .answers()
        .last()
        .cloned()
        .ok_or(SessionError::NothingSelected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use prep_core::model::{Question, QuestionId};
    use prep_core::time::{fixed_clock, fixed_now};
    use storage::Storage;

    use crate::error::GenerationError;

    struct FixedQuestions(Vec<Question>);

    #[async_trait]
    impl QuestionProvider for FixedQuestions {
        async fn generate(&self, _kind: &SessionKind) -> Result<Vec<Question>, GenerationError> {
            Ok(self.0.clone())
        }
    }

    fn question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            ["A", "B", "C", "D"].map(String::from),
            "A",
            "Biology",
        )
        .unwrap()
    }

    async fn service(questions: Vec<Question>) -> (SessionLoopService, Arc<PerformanceStore>) {
        let storage = Storage::in_memory();
        let history = Arc::new(PerformanceStore::load(storage.kv).await);
        let service = SessionLoopService::new(
            fixed_clock(),
            Arc::new(FixedQuestions(questions)),
            Arc::clone(&history),
        );
        (service, history)
    }

    #[tokio::test]
    async fn finishing_appends_one_record() {
        let (service, history) = service(vec![question(1), question(2)]).await;
        let mut session = service.start(SessionKind::DailyQuiz).await.unwrap();

        session.select("A");
        let first = service.advance(&mut session).await.unwrap();
        assert!(!first.is_complete);
        assert!(first.record.is_none());

        session.select("B");
        let last = service.advance(&mut session).await.unwrap();
        assert!(last.is_complete);
        assert!(last.persisted);
        assert!(!last.answer.is_correct);

        let record = last.record.unwrap();
        assert_eq!(record.score(), 1);
        assert_eq!(record.total(), 2);
        assert_eq!(record.completed_at(), fixed_now());
        assert_eq!(history.load_all().await, vec![record]);
    }

    #[tokio::test]
    async fn advance_errors_follow_session_state() {
        let (service, history) = service(vec![question(1)]).await;
        let mut session = service.start(SessionKind::DailyQuiz).await.unwrap();

        let err = service.advance(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::NothingSelected));

        session.select("A");
        service.advance(&mut session).await.unwrap();
        let err = service.advance(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::Completed));
        assert_eq!(history.len().await, 1);
    }

    #[tokio::test]
    async fn empty_sequence_starts_an_empty_session() {
        let (service, history) = service(Vec::new()).await;
        let mut session = service.start(SessionKind::DailyQuiz).await.unwrap();
        assert_eq!(session.state(), SessionState::Empty);

        let err = service.advance(&mut session).await.unwrap_err();
        assert!(matches!(err, SessionError::Empty));
        assert!(history.is_empty().await);
    }
}
