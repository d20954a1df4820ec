use async_trait::async_trait;
use serde::Deserialize;

use prep_core::model::{
    Difficulty, ILLUSTRATED_SUBJECT, OPTION_COUNT, Question, QuestionId, SessionKind,
};

use super::QuestionProvider;
use crate::ai::ChatClient;
use crate::error::GenerationError;

/// Subjects a full exam must cover.
pub const EXAM_SUBJECTS: [&str; 7] = [
    "Portuguese",
    "Mathematics",
    "History",
    "Geography",
    "Biology",
    "Physics",
    "Chemistry",
];

const EXAM_QUESTION_COUNT: usize = 50;
const FOCUS_QUESTION_COUNT: usize = 3;

/// Question bank backed by a chat-completions model.
#[derive(Clone)]
pub struct GenerativeQuestionBank {
    client: ChatClient,
}

impl GenerativeQuestionBank {
    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }

    async fn request(&self, prompt: &str, what: String) -> Result<Vec<Question>, GenerationError> {
        match self.client.complete_json::<GeneratedBatch>(prompt).await {
            Ok(batch) => {
                let questions = batch.into_questions();
                log::debug!("generated {} questions for {what}", questions.len());
                Ok(questions)
            }
            Err(source) => {
                log::error!("question generation for {what} failed: {source}");
                Err(GenerationError::Failed { what, source })
            }
        }
    }
}

#[async_trait]
impl QuestionProvider for GenerativeQuestionBank {
    async fn generate(&self, kind: &SessionKind) -> Result<Vec<Question>, GenerationError> {
        match kind {
            SessionKind::FullExam { difficulty } => {
                let what = format!("the {difficulty} exam");
                self.request(&exam_prompt(*difficulty), what).await
            }
            SessionKind::FocusQuiz { subject } => {
                let what = format!("the {subject} quiz");
                self.request(&focus_prompt(subject), what).await
            }
            SessionKind::DailyQuiz => Err(GenerationError::Unsupported {
                bank: "generative",
                kind: kind.title(),
            }),
        }
    }
}

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

const ANSWER_FORMAT: &str = "Reply with a JSON object {\"questions\": [...]} where each item has \
     \"id\" (integer), \"question\", \"options\" (exactly 4 distinct strings), \"answer\" (one of \
     the options, verbatim), \"subject\", \"explanation\" (short, followed by a concrete example), \
     \"hint\" (guides reasoning without giving the answer) and \"illustration\" (only for \
     Mathematics: a short hyphenated English image seed, otherwise null).";

fn exam_prompt(difficulty: Difficulty) -> String {
    format!(
        "Write a {difficulty} entrance-exam practice test with {EXAM_QUESTION_COUNT} \
         multiple-choice questions covering {}. Each question has exactly one correct option. \
         {ANSWER_FORMAT}",
        EXAM_SUBJECTS.join(", ")
    )
}

fn focus_prompt(subject: &str) -> String {
    format!(
        "Write a short quiz of {FOCUS_QUESTION_COUNT} hard multiple-choice questions about \
         {subject} for an entrance exam. Each question has exactly one correct option. \
         {ANSWER_FORMAT}"
    )
}

//
// ─── RESPONSE PARSING ──────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct GeneratedBatch {
    #[serde(default)]
    questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    #[serde(default)]
    id: Option<u64>,
    question: String,
    #[serde(default)]
    options: Vec<String>,
    answer: String,
    subject: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    hint: Option<String>,
    #[serde(default, alias = "explanation_image_url")]
    illustration: Option<String>,
}

impl GeneratedBatch {
    /// Keep the entries that form valid questions, in order.
    fn into_questions(self) -> Vec<Question> {
        self.questions
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| raw.into_question(index))
            .collect()
    }
}

impl GeneratedQuestion {
    fn into_question(self, index: usize) -> Option<Question> {
        let id = self
            .id
            .filter(|id| *id != 0)
            .unwrap_or(index as u64 + 1);

        let Ok(options) = <[String; OPTION_COUNT]>::try_from(self.options) else {
            log::warn!("dropping generated question {id}: expected {OPTION_COUNT} options");
            return None;
        };

        let mut question = Question::new(
            QuestionId::new(id),
            self.question,
            options,
            self.answer,
            self.subject,
        )
        .inspect_err(|err| log::warn!("dropping generated question {id}: {err}"))
        .ok()?;

        if let Some(hint) = self.hint.filter(|h| !h.trim().is_empty()) {
            question = question.with_hint(hint);
        }
        if let Some(explanation) = self.explanation.filter(|e| !e.trim().is_empty()) {
            question = question.with_explanation(explanation);
        }
        if let Some(illustration) = self.illustration.filter(|i| !i.trim().is_empty()) {
            if question.subject() != ILLUSTRATED_SUBJECT {
                log::debug!("ignoring illustration on {} question {id}", question.subject());
            }
            question = question.with_illustration(illustration);
        }
        Some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<Question> {
        serde_json::from_str::<GeneratedBatch>(json)
            .unwrap()
            .into_questions()
    }

    #[test]
    fn parses_complete_entries() {
        let questions = parse(
            r#"{"questions": [{
                "id": 7,
                "question": "2 + 3?",
                "options": ["4", "5", "6", "7"],
                "answer": "5",
                "subject": "Mathematics",
                "explanation": "Add them.",
                "hint": "Count on your fingers.",
                "illustration": "five-apples"
            }]}"#,
        );

        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.id(), QuestionId::new(7));
        assert_eq!(q.answer(), "5");
        assert_eq!(q.hint(), Some("Count on your fingers."));
        assert_eq!(q.illustration(), Some("five-apples"));
    }

    #[test]
    fn missing_or_zero_ids_fall_back_to_position() {
        let questions = parse(
            r#"{"questions": [
                {"question": "A?", "options": ["a","b","c","d"], "answer": "a", "subject": "History"},
                {"id": 0, "question": "B?", "options": ["a","b","c","d"], "answer": "b", "subject": "History"}
            ]}"#,
        );
        let ids: Vec<_> = questions.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn drops_entries_with_wrong_option_count_or_answer() {
        let questions = parse(
            r#"{"questions": [
                {"question": "A?", "options": ["a","b","c"], "answer": "a", "subject": "History"},
                {"question": "B?", "options": ["a","b","c","d"], "answer": "z", "subject": "History"},
                {"question": "C?", "options": ["a","b","c","d"], "answer": "c", "subject": "History"}
            ]}"#,
        );
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "C?");
        assert_eq!(questions[0].id().value(), 3);
    }

    #[test]
    fn illustration_dropped_outside_mathematics() {
        let questions = parse(
            r#"{"questions": [{"question": "Q?", "options": ["a","b","c","d"], "answer": "a",
                "subject": "Biology", "illustration": "cell-diagram"}]}"#,
        );
        assert_eq!(questions[0].illustration(), None);
    }

    #[test]
    fn empty_batch_is_not_an_error() {
        assert!(parse("{}").is_empty());
    }

    #[test]
    fn exam_prompt_names_every_subject() {
        let prompt = exam_prompt(Difficulty::Hard);
        assert!(prompt.contains("hard"));
        for subject in EXAM_SUBJECTS {
            assert!(prompt.contains(subject));
        }
    }

    #[tokio::test]
    async fn disabled_generator_reports_generation_error() {
        let bank = GenerativeQuestionBank::new(ChatClient::new(None));
        assert!(!bank.enabled());

        let err = bank
            .generate(&SessionKind::FocusQuiz {
                subject: "Physics".into(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Physics"));
    }
}
