//! Sources of question sequences for sessions.

mod catalog;
mod generative;
mod static_bank;

use async_trait::async_trait;
use prep_core::model::{Question, SessionKind};

use crate::ai::ChatClient;
use crate::error::GenerationError;

pub use generative::{EXAM_SUBJECTS, GenerativeQuestionBank};
pub use static_bank::StaticQuestionBank;

/// Supplies the ordered question sequence for one session.
///
/// May return an empty sequence; sessions report that as `Empty`.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Produce questions for a session of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when no sequence can be produced.
    async fn generate(&self, kind: &SessionKind) -> Result<Vec<Question>, GenerationError>;
}

/// Routes daily quizzes to the built-in bank and everything else to the
/// generator.
#[derive(Clone)]
pub struct QuestionBank {
    static_bank: StaticQuestionBank,
    generator: GenerativeQuestionBank,
}

impl QuestionBank {
    #[must_use]
    pub fn new(static_bank: StaticQuestionBank, generator: GenerativeQuestionBank) -> Self {
        Self {
            static_bank,
            generator,
        }
    }

    /// Built-in daily bank plus a generator configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            StaticQuestionBank::builtin(),
            GenerativeQuestionBank::new(ChatClient::from_env()),
        )
    }
}

#[async_trait]
impl QuestionProvider for QuestionBank {
    async fn generate(&self, kind: &SessionKind) -> Result<Vec<Question>, GenerationError> {
        match kind {
            SessionKind::DailyQuiz => self.static_bank.generate(kind).await,
            SessionKind::FullExam { .. } | SessionKind::FocusQuiz { .. } => {
                self.generator.generate(kind).await
            }
        }
    }
}
