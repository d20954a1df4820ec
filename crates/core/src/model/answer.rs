use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// A committed response to one question.
///
/// Correctness is fixed when the answer is created and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub selected_option: String,
    pub is_correct: bool,
}

impl Answer {
    /// Grade `selected` against the question's correct option.
    #[must_use]
    pub fn grade(question: &Question, selected: impl Into<String>) -> Self {
        let selected_option = selected.into();
        Self {
            question_id: question.id(),
            is_correct: question.is_correct(&selected_option),
            selected_option,
        }
    }
}
