use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// The only subject whose explanations may carry an illustration reference.
pub const ILLUSTRATED_SUBJECT: &str = "Mathematics";

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question subject cannot be empty")]
    EmptySubject,

    #[error("answer options must be distinct")]
    DuplicateOption,

    #[error("correct answer {answer:?} is not one of the options")]
    AnswerNotAnOption { answer: String },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly four options.
///
/// Questions are produced by a question bank and never mutated afterwards.
/// Deserialized questions are trusted as-is; only `Question::new` validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: [String; OPTION_COUNT],
    answer: String,
    subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    illustration: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or subject is blank, the options
    /// repeat, or `answer` is not one of the options.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        answer: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();
        let subject = subject.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if subject.trim().is_empty() {
            return Err(QuestionError::EmptySubject);
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption);
            }
        }
        if !options.contains(&answer) {
            return Err(QuestionError::AnswerNotAnOption { answer });
        }

        Ok(Self {
            id,
            prompt,
            options,
            answer,
            subject,
            hint: None,
            explanation: None,
            illustration: None,
        })
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Attach an illustration reference to the explanation.
    ///
    /// Ignored unless the question belongs to `ILLUSTRATED_SUBJECT`.
    #[must_use]
    pub fn with_illustration(mut self, illustration: impl Into<String>) -> Self {
        if self.subject == ILLUSTRATED_SUBJECT {
            self.illustration = Some(illustration.into());
        }
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn illustration(&self) -> Option<&str> {
        self.illustration.as_deref()
    }

    /// Exact string comparison against the correct option.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}
