use serde::Deserialize;

use prep_core::model::Question;

use crate::ai::ChatClient;
use crate::error::WritingLabError;

/// Highest score an essay can receive.
pub const MAX_ESSAY_SCORE: u8 = 10;

/// An essay theme with short texts that give it context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingPrompt {
    pub theme: String,
    #[serde(default)]
    pub support_texts: Vec<SupportText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupportText {
    pub title: String,
    pub content: String,
}

/// Graded feedback on one essay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayFeedback {
    /// `0..=MAX_ESSAY_SCORE`.
    pub score: u8,
    pub feedback: String,
    pub strengths: String,
    pub weaknesses: String,
}

#[derive(Debug, Deserialize)]
struct RawFeedback {
    score: f64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    strengths: String,
    #[serde(default)]
    weaknesses: String,
}

impl From<RawFeedback> for EssayFeedback {
    fn from(raw: RawFeedback) -> Self {
        Self {
            score: clamp_score(raw.score),
            feedback: raw.feedback,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, f64::from(MAX_ESSAY_SCORE)) as u8
}

/// Who said a line in a tutoring conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    Student,
    Tutor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Essay practice and answer tutoring on top of the chat backend.
#[derive(Clone)]
pub struct WritingLabService {
    client: ChatClient,
}

impl WritingLabService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatClient::from_env())
    }

    #[must_use]
    pub fn new(client: ChatClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.client.enabled()
    }

    /// Generate an argumentative-essay theme with two support texts.
    ///
    /// # Errors
    ///
    /// Returns `WritingLabError::Ai` if generation fails.
    pub async fn writing_prompt(&self) -> Result<WritingPrompt, WritingLabError> {
        let prompt = "Write an argumentative essay theme for an entrance exam, relevant to \
                      young students today. Reply with a JSON object {\"theme\": string, \
                      \"supportTexts\": [{\"title\": string, \"content\": string}]} holding \
                      the theme and two support texts of three or four sentences each.";
        self.client
            .complete_json(prompt)
            .await
            .inspect_err(|err| log::error!("writing prompt generation failed: {err}"))
            .map_err(WritingLabError::from)
    }

    /// Grade an essay against its theme.
    ///
    /// # Errors
    ///
    /// Returns `WritingLabError::EmptyTheme` or `WritingLabError::EmptyEssay`
    /// for blank input, and `WritingLabError::Ai` if generation fails.
    pub async fn feedback(&self, theme: &str, essay: &str) -> Result<EssayFeedback, WritingLabError> {
        if theme.trim().is_empty() {
            return Err(WritingLabError::EmptyTheme);
        }
        if essay.trim().is_empty() {
            return Err(WritingLabError::EmptyEssay);
        }

        let prompt = format!(
            "You grade entrance-exam essays. Review the essay below against its theme and give \
             constructive, specific feedback on structure (introduction, development, \
             conclusion), adherence to the theme, cohesion, argumentation and grammar.\n\n\
             Theme: \"{theme}\"\nEssay:\n\"{essay}\"\n\n\
             Reply with a JSON object {{\"score\": integer 0-{MAX_ESSAY_SCORE}, \"feedback\": \
             one paragraph, \"strengths\": '*' bullet list, \"weaknesses\": '*' bullet list \
             with concrete suggestions}}."
        );
        let raw: RawFeedback = self
            .client
            .complete_json(&prompt)
            .await
            .inspect_err(|err| log::error!("essay feedback failed: {err}"))?;
        Ok(raw.into())
    }

    /// Short tutoring reply about a question the student got wrong.
    ///
    /// # Errors
    ///
    /// Returns `WritingLabError::Ai` if generation fails.
    pub async fn tutor_reply(
        &self,
        question: &Question,
        user_answer: &str,
        history: &[ChatTurn],
    ) -> Result<String, WritingLabError> {
        let prompt = tutor_prompt(question, user_answer, history);
        self.client
            .complete(&prompt)
            .await
            .inspect_err(|err| log::error!("tutor reply failed: {err}"))
            .map_err(WritingLabError::from)
    }
}

fn tutor_prompt(question: &Question, user_answer: &str, history: &[ChatTurn]) -> String {
    let conversation = history
        .iter()
        .map(|turn| {
            let who = match turn.role {
                ChatRole::Student => "Student",
                ChatRole::Tutor => "Tutor",
            };
            format!("{who}: {}", turn.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a patient study tutor. The student answered this question incorrectly.\n\
         Question: {}\nCorrect answer: {}\nStudent answer: {user_answer}\nExplanation: {}\n\n\
         Conversation so far:\n{conversation}\n\n\
         Answer the student's last message in at most three sentences, explaining the \
         reasoning rather than just the answer.",
        question.prompt(),
        question.answer(),
        question.explanation().unwrap_or("none"),
    )
}
