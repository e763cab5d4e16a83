// src/extractors/openai.rs
use crate::extractors::models::{parse_profile, CandidateProfile};
use crate::extractors::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::extractors::Extractor;
use crate::utils::error::ExtractError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

// Models sometimes wrap the JSON in markdown fences despite the instruction
static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)```(?:json)?").expect("Failed to compile CODE_FENCE_RE")
});

/// Everything the extractor needs to reach the chat completions endpoint.
/// The credential is passed in here and never read from the environment.
#[derive(Clone)]
pub struct ExtractorConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ExtractorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

// Keeps the key out of debug logs
impl std::fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Extractor backed by an OpenAI-compatible chat completions API.
/// One request per resume, no retries.
pub struct OpenAiExtractor {
    client: reqwest::Client,
    config: ExtractorConfig,
}

impl OpenAiExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Sends the resume text and returns the model's raw message content.
    async fn complete(&self, resume_text: &str) -> Result<String, ExtractError> {
        let prompt = user_prompt(resume_text);
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: &prompt },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = self.config.completions_url();
        tracing::debug!("POST {} (model {})", url, self.config.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            tracing::warn!("Extraction API returned {}: {}", status, message);
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::Parse(format!("malformed completion body: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExtractError::EmptyContent)
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract(&self, text: &str) -> Result<CandidateProfile, ExtractError> {
        let content = self.complete(text).await?;
        tracing::debug!("Model response:\n{}", content);
        parse_profile(&strip_code_fences(&content))
    }
}

fn strip_code_fences(content: &str) -> String {
    CODE_FENCE_RE.replace_all(content, "").trim().to_string()
}
