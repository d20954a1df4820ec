use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::RecordId;
use crate::model::review::{ReviewItem, review_items};
use crate::model::{Answer, Question};
use crate::scoring;
use crate::stats::percentage;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecordError {
    #[error("too many questions for a single record: {len}")]
    TooManyQuestions { len: usize },

    #[error("answer count ({answers}) does not match question count ({questions})")]
    LengthMismatch { questions: usize, answers: usize },

    #[error("score ({score}) exceeds total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("score ({score}) does not match correct answers ({correct})")]
    ScoreMismatch { score: u32, correct: u32 },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty requested for a full exam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseDifficultyError(s.to_owned()))
    }
}

//
// ─── SESSION KIND ──────────────────────────────────────────────────────────────
//

/// What kind of session produced a record, with the metadata that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionKind {
    FullExam { difficulty: Difficulty },
    DailyQuiz,
    FocusQuiz { subject: String },
}

impl SessionKind {
    /// Human-readable title for result and history screens.
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            SessionKind::FullExam { difficulty } => format!("Full exam ({difficulty})"),
            SessionKind::DailyQuiz => "Daily quiz".to_owned(),
            SessionKind::FocusQuiz { subject } => format!("Focus quiz: {subject}"),
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        match self {
            SessionKind::FocusQuiz { subject } => Some(subject),
            _ => None,
        }
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            SessionKind::FullExam { difficulty } => Some(*difficulty),
            _ => None,
        }
    }
}

//
// ─── PERFORMANCE RECORD ────────────────────────────────────────────────────────
//

/// Immutable summary of one completed session, with full copies of its
/// questions and answers for later review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedRecord")]
pub struct PerformanceRecord {
    id: RecordId,
    completed_at: DateTime<Utc>,
    kind: SessionKind,
    score: u32,
    total: u32,
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

#[derive(Deserialize)]
struct PersistedRecord {
    id: RecordId,
    completed_at: DateTime<Utc>,
    kind: SessionKind,
    score: u32,
    total: u32,
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

impl TryFrom<PersistedRecord> for PerformanceRecord {
    type Error = RecordError;

    fn try_from(raw: PersistedRecord) -> Result<Self, Self::Error> {
        Self::from_persisted(
            raw.id,
            raw.completed_at,
            raw.kind,
            raw.score,
            raw.total,
            raw.questions,
            raw.answers,
        )
    }
}

impl PerformanceRecord {
    /// Build a record from a finished session; score and total are derived.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::LengthMismatch` if answers are not 1:1 with questions.
    /// Returns `RecordError::TooManyQuestions` if the count cannot fit in `u32`.
    pub fn from_session(
        id: RecordId,
        completed_at: DateTime<Utc>,
        kind: SessionKind,
        questions: Vec<Question>,
        answers: Vec<Answer>,
    ) -> Result<Self, RecordError> {
        if questions.len() != answers.len() {
            return Err(RecordError::LengthMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        let total = u32::try_from(questions.len())
            .map_err(|_| RecordError::TooManyQuestions { len: questions.len() })?;
        let score = scoring::score(&answers);

        Self::from_persisted(id, completed_at, kind, score, total, questions, answers)
    }

    /// Rehydrate a record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::ScoreExceedsTotal` or `RecordError::ScoreMismatch`
    /// if the stored counts contradict the embedded answers.
    pub fn from_persisted(
        id: RecordId,
        completed_at: DateTime<Utc>,
        kind: SessionKind,
        score: u32,
        total: u32,
        questions: Vec<Question>,
        answers: Vec<Answer>,
    ) -> Result<Self, RecordError> {
        if score > total {
            return Err(RecordError::ScoreExceedsTotal { score, total });
        }
        let correct = scoring::score(&answers);
        if correct != score {
            return Err(RecordError::ScoreMismatch { score, correct });
        }

        Ok(Self {
            id,
            completed_at,
            kind,
            score,
            total,
            questions,
            answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn kind(&self) -> &SessionKind {
        &self.kind
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Share of correct answers, 0..=100. Zero when the record has no questions.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(u64::from(self.score), u64::from(self.total))
    }

    /// Questions paired with their answers by position.
    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem<'_>> {
        review_items(&self.questions, &self.answers)
    }
}
