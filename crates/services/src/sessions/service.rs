use chrono::{DateTime, Utc};
use std::fmt;

use prep_core::model::{Answer, Question, SessionKind};

use super::progress::SessionProgress;

//
// ─── STATE & TRANSITIONS ───────────────────────────────────────────────────────
//

/// Where a session is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The current question has no pending selection.
    AwaitingSelection,
    /// An option is pending for the current question.
    Selected,
    /// Every question has been answered.
    Finished,
    /// The session was built from an empty question sequence.
    Empty,
}

impl SessionState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Empty)
    }
}

/// Everything a finished session hands over for scoring and recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub kind: SessionKind,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

/// Result of feeding one event to a `SessionEngine`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The event is not valid in the current state; nothing changed.
    Rejected,
    /// A selection is now pending.
    Selected,
    /// The answer was recorded and the next question is current.
    Next,
    /// The last answer was recorded.
    Finished(SessionOutcome),
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one quiz or exam run over a fixed question sequence.
///
/// Transitions never fail: misuse yields `Transition::Rejected` and leaves
/// the session untouched. Answers stay index-aligned with the questions.
pub struct SessionEngine {
    kind: SessionKind,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Answer>,
    pending: Option<String>,
    started_at: DateTime<Utc>,
}

impl SessionEngine {
    /// Build a session; an empty sequence yields one in `SessionState::Empty`.
    ///
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(kind: SessionKind, questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            questions,
            current: 0,
            answers: Vec::new(),
            pending: None,
            started_at,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::Empty
        } else if self.answers.len() == self.questions.len() {
            SessionState::Finished
        } else if self.pending.is_some() {
            SessionState::Selected
        } else {
            SessionState::AwaitingSelection
        }
    }

    /// 0-based position of the current question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question awaiting an answer, if the session is still running.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.state().is_terminal() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            current_index: self.current,
            is_complete: self.state() == SessionState::Finished,
        }
    }

    /// One flag per question, `true` once that question has an answer.
    #[must_use]
    pub fn answered_flags(&self) -> Vec<bool> {
        (0..self.questions.len())
            .map(|index| index < self.answers.len())
            .collect()
    }

    /// Set or overwrite the pending selection for the current question.
    pub fn select(&mut self, option: impl Into<String>) -> Transition {
        if self.state().is_terminal() {
            return Transition::Rejected;
        }
        self.pending = Some(option.into());
        Transition::Selected
    }

    /// Select the current question's option at `index` (0-based).
    pub fn select_index(&mut self, index: usize) -> Transition {
        let Some(option) = self
            .current_question()
            .and_then(|question| question.options().get(index))
            .cloned()
        else {
            return Transition::Rejected;
        };
        self.select(option)
    }

    /// Record the pending selection as the current question's answer.
    ///
    /// Only valid while a selection is pending.
    pub fn advance(&mut self) -> Transition {
        if self.state() != SessionState::Selected {
            return Transition::Rejected;
        }
        let (Some(question), Some(selected)) =
            (self.questions.get(self.current), self.pending.take())
        else {
            return Transition::Rejected;
        };

        let answer = Answer::grade(question, selected);
        log::debug!(
            "answered question {} ({}/{}), correct: {}",
            answer.question_id,
            self.current + 1,
            self.questions.len(),
            answer.is_correct
        );
        self.answers.push(answer);

        if self.current + 1 == self.questions.len() {
            Transition::Finished(SessionOutcome {
                kind: self.kind.clone(),
                questions: self.questions.clone(),
                answers: self.answers.clone(),
            })
        } else {
            self.current += 1;
            Transition::Next
        }
    }

    /// Abandon the session. Nothing is handed over for recording.
    pub fn exit(self) {
        log::debug!(
            "exited {} after {} of {} answers",
            self.kind.title(),
            self.answers.len(),
            self.questions.len()
        );
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("kind", &self.kind)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("pending", &self.pending)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::model::QuestionId;
    use prep_core::scoring::score;
    use prep_core::time::fixed_now;

    fn question(id: u64, answer: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {id}"),
            ["A", "B", "C", "D"].map(String::from),
            answer,
            "History",
        )
        .unwrap()
    }

    fn engine(questions: Vec<Question>) -> SessionEngine {
        SessionEngine::new(SessionKind::DailyQuiz, questions, fixed_now())
    }

    #[test]
    fn two_question_run_finishes_with_aligned_answers() {
        let mut session = engine(vec![question(1, "B"), question(2, "C")]);
        assert_eq!(session.state(), SessionState::AwaitingSelection);

        assert_eq!(session.select("B"), Transition::Selected);
        assert_eq!(session.advance(), Transition::Next);
        assert_eq!(session.state(), SessionState::AwaitingSelection);
        assert_eq!(session.current_index(), 1);

        session.select("A");
        let Transition::Finished(outcome) = session.advance() else {
            panic!("expected the session to finish");
        };

        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(outcome.kind, SessionKind::DailyQuiz);
        assert_eq!(outcome.answers.len(), outcome.questions.len());
        assert_eq!(outcome.answers[0].question_id, QuestionId::new(1));
        assert!(outcome.answers[0].is_correct);
        assert_eq!(outcome.answers[1].selected_option, "A");
        assert!(!outcome.answers[1].is_correct);
        assert_eq!(score(&outcome.answers), 1);
    }

    #[test]
    fn empty_sequence_is_terminal_and_distinct_from_finished() {
        let mut session = engine(Vec::new());
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.current_question().is_none());
        assert_eq!(session.select("A"), Transition::Rejected);
        assert_eq!(session.advance(), Transition::Rejected);
        assert!(!session.progress().is_complete);
    }

    #[test]
    fn reselecting_overwrites_without_appending() {
        let mut session = engine(vec![question(1, "D"), question(2, "A")]);
        session.select("A");
        session.select("C");
        session.select("D");
        assert!(session.answers().is_empty());
        assert_eq!(session.pending(), Some("D"));

        session.advance();
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.answers()[0].selected_option, "D");
        assert!(session.pending().is_none());
    }

    #[test]
    fn advance_without_selection_is_rejected() {
        let mut session = engine(vec![question(1, "A")]);
        assert_eq!(session.advance(), Transition::Rejected);
        assert_eq!(session.state(), SessionState::AwaitingSelection);
        assert!(session.answers().is_empty());
    }

    #[test]
    fn finished_session_rejects_further_events() {
        let mut session = engine(vec![question(1, "A")]);
        session.select_index(0);
        assert!(matches!(session.advance(), Transition::Finished(_)));

        assert_eq!(session.select("B"), Transition::Rejected);
        assert_eq!(session.advance(), Transition::Rejected);
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn select_index_out_of_range_is_rejected() {
        let mut session = engine(vec![question(1, "A")]);
        assert_eq!(session.select_index(4), Transition::Rejected);
        assert_eq!(session.state(), SessionState::AwaitingSelection);

        assert_eq!(session.select_index(2), Transition::Selected);
        assert_eq!(session.pending(), Some("C"));
    }

    #[test]
    fn progress_and_flags_track_answers() {
        let mut session = engine(vec![question(1, "A"), question(2, "B"), question(3, "C")]);
        session.select("A");
        session.advance();

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 2);
        assert_eq!(progress.current_index, 1);
        assert!(!progress.is_complete);
        assert_eq!(session.answered_flags(), vec![true, false, false]);
    }
}
