//! Anthropic Messages API adapter

use async_trait::async_trait;
use product_recs_domain::{GenerateError, GenerateInput, GeneratedPick, RecommendationGenerator};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{
    LlmConfig, SYSTEM_PROMPT, build_recommendation_prompt, check_status, http_client,
    picks_from_text, send_error,
};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Anthropic generator
pub struct AnthropicGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl AnthropicGenerator {
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
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_output_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            system: Some(SYSTEM_PROMPT.to_string()),
            temperature: Some(self.config.temperature),
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let api_response: AnthropicResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        let text = api_response
            .content
            .into_iter()
            .filter(|c| c.r#type == "text")
            .map(|c| c.text)
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(GenerateError::InvalidFormat("Empty response".to_string()));
        }

        Ok(text)
    }
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    r#type: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl RecommendationGenerator for AnthropicGenerator {
    async fn generate(&self, input: GenerateInput<'_>) -> Result<Vec<GeneratedPick>, GenerateError> {
        let prompt = build_recommendation_prompt(&input);
        let text = self.call_api(&prompt).await?;
        picks_from_text(self.name(), &text)
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
