//! Derived statistics over the performance history.
//!
//! Everything here is recomputed from the full log on every call.

use std::collections::HashMap;

use crate::model::PerformanceRecord;

/// Correct answers as a percentage of `total`; zero when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(correct: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}

/// Accuracy for one subject across the whole history.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectAccuracy {
    pub subject: String,
    pub correct: u64,
    pub total: u64,
    pub percentage: f64,
}

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverallStats {
    pub total_questions: u64,
    pub total_correct: u64,
    pub average: f64,
}

/// Sum of scores over sum of totals, as a percentage.
#[must_use]
pub fn overall_accuracy(log: &[PerformanceRecord]) -> f64 {
    overall_stats(log).average
}

#[must_use]
pub fn overall_stats(log: &[PerformanceRecord]) -> OverallStats {
    let (total_correct, total_questions) = log.iter().fold((0_u64, 0_u64), |(c, t), r| {
        (c + u64::from(r.score()), t + u64::from(r.total()))
    });
    OverallStats {
        total_questions,
        total_correct,
        average: percentage(total_correct, total_questions),
    }
}

/// Per-subject accuracy, best subject first.
///
/// Every question of every record counts once toward its subject; it counts
/// as correct when the answer at the same index is correct. Equal
/// percentages keep the order in which subjects were first seen.
#[must_use]
pub fn per_subject_accuracy(log: &[PerformanceRecord]) -> Vec<SubjectAccuracy> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, u64, u64)> = Vec::new();

    for record in log {
        for (i, question) in record.questions().iter().enumerate() {
            let slot = *index.entry(question.subject()).or_insert_with(|| {
                tallies.push((question.subject(), 0, 0));
                tallies.len() - 1
            });
            let tally = &mut tallies[slot];
            tally.2 += 1;
            if record.answers().get(i).is_some_and(|a| a.is_correct) {
                tally.1 += 1;
            }
        }
    }

    let mut out: Vec<SubjectAccuracy> = tallies
        .into_iter()
        .map(|(subject, correct, total)| SubjectAccuracy {
            subject: subject.to_owned(),
            correct,
            total,
            percentage: percentage(correct, total),
        })
        .collect();
    out.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Answer, Question, QuestionId, RecordId, SessionKind};
    use crate::time::fixed_now;

    fn record(subject: &str, correct: usize, total: usize) -> PerformanceRecord {
        let questions: Vec<Question> = (0..total)
            .map(|i| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("{subject} {i}"),
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
            SessionKind::DailyQuiz,
            questions,
            answers,
        )
        .unwrap()
    }

    #[test]
    fn empty_log_is_zero() {
        assert_eq!(overall_accuracy(&[]), 0.0);
        assert!(per_subject_accuracy(&[]).is_empty());
        assert_eq!(overall_stats(&[]), OverallStats::default());
    }

    #[test]
    fn all_zero_totals_do_not_divide_by_zero() {
        let log = vec![record("Math", 0, 0), record("History", 0, 0)];
        assert_eq!(overall_accuracy(&log), 0.0);
    }

    #[test]
    fn two_record_scenario() {
        let log = vec![record("Math", 3, 5), record("History", 2, 3)];

        assert!((overall_accuracy(&log) - 62.5).abs() < 1e-9);

        let subjects = per_subject_accuracy(&log);
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].subject, "History");
        assert!((subjects[0].percentage - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(subjects[1].subject, "Math");
        assert!((subjects[1].percentage - 60.0).abs() < 1e-9);
    }

    #[test]
    fn subjects_partition_all_questions() {
        let log = vec![record("Math", 1, 2), record("Math", 2, 2), record("Physics", 0, 4)];
        let subjects = per_subject_accuracy(&log);

        let total: u64 = subjects.iter().map(|s| s.total).sum();
        let questions: usize = log.iter().map(|r| r.questions().len()).sum();
        assert_eq!(total, questions as u64);

        let math = subjects.iter().find(|s| s.subject == "Math").unwrap();
        assert_eq!((math.correct, math.total), (3, 4));
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let log = vec![record("Chemistry", 1, 2), record("Biology", 2, 4), record("Art", 2, 2)];
        let names: Vec<_> = per_subject_accuracy(&log)
            .into_iter()
            .map(|s| s.subject)
            .collect();
        assert_eq!(names, vec!["Art", "Chemistry", "Biology"]);
    }

    #[test]
    fn results_are_sorted_descending() {
        let log = vec![record("A", 1, 4), record("B", 3, 4), record("C", 2, 4)];
        let subjects = per_subject_accuracy(&log);
        assert!(subjects.windows(2).all(|w| w[0].percentage >= w[1].percentage));
    }
}
