use async_trait::async_trait;
use rand::rng;
use rand::seq::SliceRandom;

use prep_core::model::{Question, SessionKind};

use super::QuestionProvider;
use super::catalog::builtin_questions;
use crate::error::GenerationError;

/// In-memory question set that serves daily quizzes.
#[derive(Debug, Clone)]
pub struct StaticQuestionBank {
    questions: Vec<Question>,
}

impl StaticQuestionBank {
    /// Questions drawn for one daily quiz.
    pub const DAILY_QUIZ_SIZE: usize = 3;

    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_questions())
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// A random sample of up to `DAILY_QUIZ_SIZE` distinct questions.
    #[must_use]
    pub fn daily_quiz(&self) -> Vec<Question> {
        let mut sample = self.questions.clone();
        sample.shuffle(&mut rng());
        sample.truncate(Self::DAILY_QUIZ_SIZE);
        sample
    }
}

#[async_trait]
impl QuestionProvider for StaticQuestionBank {
    async fn generate(&self, kind: &SessionKind) -> Result<Vec<Question>, GenerationError> {
        match kind {
            SessionKind::DailyQuiz => Ok(self.daily_quiz()),
            other => Err(GenerationError::Unsupported {
                bank: "built-in",
                kind: other.title(),
            }),
        }
    }
}
