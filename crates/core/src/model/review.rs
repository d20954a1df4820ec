use crate::model::{Answer, Question};

/// A question alongside the answer given to it, for result screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewItem<'a> {
    pub question: &'a Question,
    pub answer: &'a Answer,
}

impl ReviewItem<'_> {
    /// The correct option, shown only when the answer was wrong.
    #[must_use]
    pub fn correction(&self) -> Option<&str> {
        (!self.answer.is_correct).then(|| self.question.answer())
    }
}

/// Pair questions and answers by position.
///
/// Pairing never looks answers up by question id, since ids are only unique
/// per sequence and may repeat. Stops at the shorter of the two sequences.
#[must_use]
pub fn review_items<'a>(questions: &'a [Question], answers: &'a [Answer]) -> Vec<ReviewItem<'a>> {
    questions
        .iter()
        .zip(answers)
        .map(|(question, answer)| ReviewItem { question, answer })
        .collect()
}
