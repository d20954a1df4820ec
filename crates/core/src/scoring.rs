//! Scoring of committed answers.

use crate::model::Answer;

/// Number of correct answers.
///
/// Total over any input; saturates at `u32::MAX`.
#[must_use]
pub fn score(answers: &[Answer]) -> u32 {
    let correct = answers.iter().filter(|a| a.is_correct).count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionId;

    fn answer(id: u64, is_correct: bool) -> Answer {
        Answer {
            question_id: QuestionId::new(id),
            selected_option: "A".into(),
            is_correct,
        }
    }

    #[test]
    fn empty_scores_zero() {
        assert_eq!(score(&[]), 0);
    }

    #[test]
    fn counts_only_correct_answers() {
        let answers = vec![answer(1, true), answer(2, false), answer(3, true)];
        let s = score(&answers);
        assert_eq!(s, 2);
        assert!(s as usize <= answers.len());
    }
}
