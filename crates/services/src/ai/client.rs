use std::env;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Connection settings for an OpenAI-compatible chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ChatConfig {
    /// Read `PREP_AI_API_KEY`, `PREP_AI_BASE_URL` and `PREP_AI_MODEL`.
    ///
    /// Returns `None` when no API key is set, which disables generation.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("PREP_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("PREP_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("PREP_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Thin chat-completions client shared by the question generator and the
/// writing lab.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    config: Option<ChatConfig>,
}

impl ChatClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ChatConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ChatConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate free text from a prompt.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the client is disabled, the request fails,
    /// or the response is empty.
    pub async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.send(prompt, false).await
    }

    /// Generate a JSON object from a prompt and decode it as `T`.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Malformed` if the reply is not valid JSON for `T`,
    /// plus every error `complete` can return.
    pub async fn complete_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, AiError> {
        let content = self.send(prompt, true).await?;
        Ok(serde_json::from_str(strip_code_fence(&content))?)
    }

    async fn send(&self, prompt: &str, json: bool) -> Result<String, AiError> {
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.7,
            response_format: json.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        log::debug!("chat completion request to {url} (json: {json})");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Drop a surrounding Markdown code fence, if the model added one.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
