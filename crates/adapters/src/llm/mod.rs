//! LLM provider adapters

pub mod anthropic;
pub mod ollama;
pub mod openai;
pub mod stub;

pub use anthropic::AnthropicGenerator;
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use product_recs_domain::{GenerateError, GenerateInput, GeneratedPick};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Common LLM configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-1.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_output_tokens: 1000,
            timeout_secs: 30,
        }
    }
}

/// Build an HTTP client honoring the configured timeout
fn http_client(config: &LlmConfig) -> Result<Client, GenerateError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| GenerateError::Config(format!("Failed to build HTTP client: {}", e)))
}

fn send_error(e: reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::Timeout
    } else {
        GenerateError::Api(e.to_string())
    }
}

/// Map rate limiting and non-2xx statuses to errors
async fn check_status(response: Response) -> Result<Response, GenerateError> {
    if response.status() == 429 {
        return Err(GenerateError::RateLimited);
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(GenerateError::Api(format!(
            "API returned {}: {}",
            status, body
        )));
    }

    Ok(response)
}

/// Turn provider text into picks, logging unparseable output
fn picks_from_text(provider: &str, text: &str) -> Result<Vec<GeneratedPick>, GenerateError> {
    parse_recommendation_response(text).map_err(|e| {
        tracing::warn!(provider, error = %e, "Failed to parse generator response");
        GenerateError::InvalidFormat(e)
    })
}

/// System instructions sent alongside every recommendation prompt
pub const SYSTEM_PROMPT: &str = r#"You are a product recommendation system that MUST follow these exact formats for explanations:
- REQUIRED FORMAT: "Since you liked [Product Name], you'll love [new product] for [specific feature]"
- ONLY if no similar liked products exist: "Based on your interest in [category/brand], you'll love [product] for [specific feature]"

You MUST use the first format ("Since you liked...") if the user has ANY liked products.
Output only valid JSON."#;

#[derive(Serialize)]
struct PromptProduct<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    brand: &'a str,
    price: Option<f64>,
    description: &'a str,
}

/// Build the recommendation prompt
pub fn build_recommendation_prompt(input: &GenerateInput<'_>) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are an expert AI shopping assistant who personalizes product recommendations.\n\n",
    );

    prompt.push_str("## Liked Products\n");
    if input.liked.is_empty() {
        prompt.push_str("- (none)\n");
    }
    for liked in input.liked {
        let price = liked
            .price
            .map(|p| format!("${:.2}", p))
            .unwrap_or_else(|| "unknown".to_string());
        prompt.push_str(&format!(
            "- {} (Category: {}, Brand: {}, Price: {})\n",
            liked.name,
            liked.category,
            liked.brand.as_deref().unwrap_or("unknown"),
            price
        ));
    }

    let preferences = input.preferences;
    let categories = if preferences.categories.is_empty() {
        "all categories".to_string()
    } else {
        preferences.categories.join(", ")
    };
    let brands = if preferences.brands.is_empty() {
        "all brands".to_string()
    } else {
        preferences.brands.join(", ")
    };

    prompt.push_str("\n## User Preferences\n");
    prompt.push_str(&format!("- Price Range: {}\n", preferences.price_range));
    prompt.push_str(&format!("- Categories: {}\n", categories));
    prompt.push_str(&format!("- Brands: {}\n\n", brands));

    let catalog: Vec<PromptProduct<'_>> = input
        .catalog
        .iter()
        .map(|p| PromptProduct {
            id: &p.id,
            name: &p.name,
            category: &p.category,
            brand: &p.brand,
            price: p.numeric_price(),
            description: &p.description,
        })
        .collect();

    prompt.push_str("## Available Products\n");
    prompt.push_str(&serde_json::to_string_pretty(&catalog).unwrap_or_else(|_| "[]".to_string()));
    prompt.push_str("\n\n");

    prompt.push_str(
        r#"## Task
Recommend 3 products from the available catalog that this user would enjoy most.

Rules:
1. NEVER recommend products the user has already liked
2. Match the user's price range, categories and brands; strictly respect the price range
3. Recommend products from at least 2 different categories
4. Mix similar products with complementary ones
5. Every recommendation needs a personalized explanation in one of the required formats

## Output Format
Respond with ONLY a JSON array of exactly 3 objects:
[
  {
    "product_id": "prod123",
    "explanation": "Since you liked Premium Wireless Headphones, you'll love Smart Home Security Camera for its high-definition video quality."
  }
]
"#,
    );

    prompt
}

/// Accepts a bare array or an object wrapping it
#[derive(Deserialize)]
#[serde(untagged)]
enum PicksPayload {
    List(Vec<GeneratedPick>),
    Wrapped { recommendations: Vec<GeneratedPick> },
}

/// Parse a generator response into picks
pub fn parse_recommendation_response(response: &str) -> Result<Vec<GeneratedPick>, String> {
    let json_str = extract_json(response);

    if json_str.is_empty() {
        return Err("Empty response".to_string());
    }

    let payload: PicksPayload =
        serde_json::from_str(json_str).map_err(|e| format!("Failed to parse JSON: {}", e))?;

    Ok(match payload {
        PicksPayload::List(picks) => picks,
        PicksPayload::Wrapped { recommendations } => recommendations,
    })
}

/// Extract JSON from response (handles markdown code blocks)
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // Check for ```json ... ``` blocks
    if let Some(start) = trimmed.find("```json") {
        if let Some(end) = trimmed[start + 7..].find("```") {
            return trimmed[start + 7..start + 7 + end].trim();
        }
    }

    // Check for ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        if let Some(end) = trimmed[start + 3..].find("```") {
            let content = trimmed[start + 3..start + 3 + end].trim();
            // Skip language identifier if present
            if let Some(newline) = content.find('\n') {
                let first_line = &content[..newline];
                if !first_line.starts_with('[') && !first_line.starts_with('{') {
                    return content[newline + 1..].trim();
                }
            }
            return content;
        }
    }

    // Assume raw JSON
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use product_recs_domain::{LikedProduct, Preferences, Product};
    use std::sync::Arc;

    #[test]
    fn test_extract_json_raw() {
        let input = r#"[{"product_id": "p1", "explanation": "x"}]"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_json_code_block() {
        let input = "```json\n[{\"product_id\": \"p1\"}]\n```";
        assert_eq!(extract_json(input), r#"[{"product_id": "p1"}]"#);
    }

    #[test]
    fn test_extract_json_untagged_code_block() {
        let input = "Here you go:\n```\n[]\n```";
        assert_eq!(extract_json(input), "[]");
    }

    #[test]
    fn test_parse_array_response() {
        let json = r#"[
            {"product_id": "p1", "explanation": "Since you liked A, you'll love B for its sound"},
            {"product_id": 42, "explanation": "Numeric id"}
        ]"#;

        let picks = parse_recommendation_response(json).unwrap();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[1].product_id, "42");
    }

    #[test]
    fn test_parse_wrapped_response() {
        let json = r#"{"recommendations": [{"product_id": "p9"}]}"#;

        let picks = parse_recommendation_response(json).unwrap();
        assert_eq!(picks[0].product_id, "p9");
        assert_eq!(picks[0].explanation, "");
    }

    #[test]
    fn test_parse_rejects_garbage_and_empty() {
        assert!(parse_recommendation_response("I think you'd like the mug").is_err());
        assert!(parse_recommendation_response("   ").is_err());
    }

    #[test]
    fn test_prompt_contains_user_data_and_catalog() {
        let liked = vec![LikedProduct {
            id: "p1".to_string(),
            name: "Trail Runners".to_string(),
            category: "Footwear".to_string(),
            brand: Some("Salomon".to_string()),
            price: Some(120.0),
        }];
        let preferences = Preferences {
            price_range: "50-150".to_string(),
            categories: vec!["Sports".to_string()],
            brands: vec![],
        };
        let catalog = vec![Arc::new(Product {
            id: "p2".to_string(),
            name: "Hydration Vest".to_string(),
            description: "Lightweight, 2L bladder".to_string(),
            price: 89.0,
            category: "Sports".to_string(),
            brand: "Salomon".to_string(),
            image: None,
            rating: None,
        })];

        let prompt = build_recommendation_prompt(&GenerateInput {
            liked: &liked,
            preferences: &preferences,
            catalog: &catalog,
        });

        assert!(prompt.contains("Trail Runners (Category: Footwear, Brand: Salomon, Price: $120.00)"));
        assert!(prompt.contains("- Price Range: 50-150"));
        assert!(prompt.contains("- Brands: all brands"));
        assert!(prompt.contains("\"id\": \"p2\""));
        assert!(prompt.contains("product_id"));
    }
}
