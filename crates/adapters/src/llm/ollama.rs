//! Ollama local LLM adapter

use async_trait::async_trait;
use product_recs_domain::{GenerateError, GenerateInput, GeneratedPick, RecommendationGenerator};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{
    LlmConfig, SYSTEM_PROMPT, build_recommendation_prompt, check_status, http_client,
    picks_from_text, send_error,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Ollama generator for local LLMs
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    config: LlmConfig,
}

impl OllamaGenerator {
    pub fn new(config: LlmConfig) -> Result<Self, GenerateError> {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), config)
    }

    pub fn with_base_url(base_url: String, config: LlmConfig) -> Result<Self, GenerateError> {
        Ok(Self {
            client: http_client(&config)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    async fn call_api(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = OllamaRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system: Some(SYSTEM_PROMPT.to_string()),
            stream: false,
            options: Some(OllamaOptions {
                temperature: Some(self.config.temperature),
                num_predict: Some(self.config.max_output_tokens as i32),
            }),
        };

        let url = format!("{}/api/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(send_error)?;

        let api_response: OllamaResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        if api_response.response.is_empty() {
            return Err(GenerateError::InvalidFormat("Empty response".to_string()));
        }

        Ok(api_response.response)
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl RecommendationGenerator for OllamaGenerator {
    async fn generate(&self, input: GenerateInput<'_>) -> Result<Vec<GeneratedPick>, GenerateError> {
        let prompt = build_recommendation_prompt(&input);
        let text = self.call_api(&prompt).await?;
        picks_from_text(self.name(), &text)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
