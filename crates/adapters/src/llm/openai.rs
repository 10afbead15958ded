//! OpenAI chat completions adapter (also serves OpenAI-compatible providers)

use async_trait::async_trait;
use product_recs_domain::{GenerateError, GenerateInput, GeneratedPick, RecommendationGenerator};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{
    LlmConfig, SYSTEM_PROMPT, build_recommendation_prompt, check_status, http_client,
    picks_from_text, send_error,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Generator backed by a `/chat/completions` endpoint
pub struct OpenAiGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl OpenAiGenerator {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Result<Self, GenerateError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), config)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: String,
        config: LlmConfig,
    ) -> Result<Self, GenerateError> {
        Ok(Self {
            client: http_client(&config)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_output_tokens),
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let api_response: ChatCompletionResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GenerateError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl RecommendationGenerator for OpenAiGenerator {
    async fn generate(&self, input: GenerateInput<'_>) -> Result<Vec<GeneratedPick>, GenerateError> {
        let prompt = build_recommendation_prompt(&input);
        let text = self.call_api(&prompt).await?;
        picks_from_text(self.name(), &text)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
