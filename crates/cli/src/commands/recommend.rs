//! Recommend command - one-shot recommendation

use anyhow::{Context, Result, bail};
use product_recs_adapters::{
    catalog::FsCatalogSource,
    llm::{
        AnthropicGenerator, LlmConfig as AdapterLlmConfig, OllamaGenerator, OpenAiGenerator,
        StubGenerator,
    },
};
use product_recs_domain::usecases::{RecommendConfig, RecommendUseCase};
use product_recs_domain::{
    LikedProduct, Preferences, RecommendationGenerator, RecommendationRequest,
};
use secrecy::SecretString;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::args::RecommendArgs;
use crate::config::AppConfig;

pub async fn execute(args: RecommendArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    let catalog_path = args.catalog.as_ref().unwrap_or(&config.catalog.path);

    let usecase = build_usecase(&config, catalog_path).await;
    let request = build_request(&args, &usecase)?;

    tracing::info!(
        liked_count = request.liked_products.len(),
        price_range = %request.preferences.price_range,
        "Recommending products"
    );

    let response = usecase.recommend(&request).await;

    if args.json {
        let json = serde_json::to_string_pretty(&response).context("Failed to serialize output")?;
        println!("{}", json);
    } else {
        println!("Recommendations");
        println!("===============");
        println!();

        if response.recommendations.is_empty() {
            println!("No products available for these preferences.");
        }

        for (i, rec) in response.recommendations.iter().enumerate() {
            let price = rec
                .product
                .numeric_price()
                .map(|p| format!("${:.2}", p))
                .unwrap_or_else(|| "n/a".to_string());
            println!(
                "{}. {} [{}] ({}, {})",
                i + 1,
                rec.product.name,
                rec.product.id,
                rec.product.category,
                price
            );
            println!("   {}", rec.explanation);
            println!();
        }
    }

    Ok(())
}

/// Load the catalog and wire the generator selected by config
pub(crate) async fn build_usecase(config: &AppConfig, catalog_path: &Path) -> RecommendUseCase {
    let catalog = FsCatalogSource::new(catalog_path).load_or_empty().await;

    let generator = match build_generator(config) {
        Ok(generator) => generator,
        Err(e) => {
            tracing::warn!(
                provider = %config.llm.provider,
                error = %e,
                "Generator unavailable, using deterministic selector only"
            );
            None
        }
    };

    RecommendUseCase::new(
        Arc::new(catalog),
        generator,
        RecommendConfig {
            generator_timeout: Duration::from_secs(config.llm.timeout_secs),
        },
    )
}

/// The configured generator, or `None` in mock mode
pub(crate) fn build_generator(
    config: &AppConfig,
) -> Result<Option<Arc<dyn RecommendationGenerator>>> {
    if config.llm.use_mock {
        return Ok(None);
    }

    let llm_config = adapter_llm_config(&config.llm);

    let generator: Arc<dyn RecommendationGenerator> = match config.llm.provider.as_str() {
        "openai" => {
            let api_key = load_api_key(&config.llm.openai.api_key_env, "openai")?;
            Arc::new(OpenAiGenerator::with_base_url(
                api_key,
                config.llm.openai.base_url.clone(),
                llm_config,
            )?)
        }
        "openai_compat" => {
            let base_url = config.llm.openai_compat.base_url.trim();
            if base_url.is_empty() {
                bail!("OpenAI-compatible base_url is required");
            }
            let api_key = load_api_key(&config.llm.openai_compat.api_key_env, "openai_compat")?;
            Arc::new(OpenAiGenerator::with_base_url(
                api_key,
                base_url.to_string(),
                llm_config,
            )?)
        }
        "anthropic" => {
            let api_key = load_api_key(&config.llm.anthropic.api_key_env, "anthropic")?;
            Arc::new(AnthropicGenerator::new(api_key, llm_config)?)
        }
        "ollama" => {
            let base_url = config.llm.ollama.base_url.trim();
            if base_url.is_empty() {
                Arc::new(OllamaGenerator::new(llm_config)?)
            } else {
                Arc::new(OllamaGenerator::with_base_url(
                    base_url.to_string(),
                    llm_config,
                )?)
            }
        }
        "stub" => Arc::new(StubGenerator::top_rated()),
        other => bail!("Unknown LLM provider: {}", other),
    };

    Ok(Some(generator))
}

fn adapter_llm_config(config: &crate::config::LlmConfig) -> AdapterLlmConfig {
    AdapterLlmConfig {
        model: config.model.clone(),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
        timeout_secs: config.timeout_secs,
    }
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for provider {}", provider);
    }

    let key = std::env::var(env_var).with_context(|| {
        format!(
            "Missing API key env var {} for provider {}",
            env_var, provider
        )
    })?;

    if key.trim().is_empty() {
        bail!(
            "API key env var {} is empty for provider {}",
            env_var,
            provider
        );
    }

    Ok(SecretString::new(key.into()))
}

fn build_request(args: &RecommendArgs, usecase: &RecommendUseCase) -> Result<RecommendationRequest> {
    if let Some(ref path) = args.request {
        let body = read_request_body(path)?;
        return serde_json::from_str(&body).context("Invalid recommendation request JSON");
    }

    let mut liked = Vec::with_capacity(args.liked.len());
    for id in &args.liked {
        match usecase.catalog().get(id) {
            Some(product) => liked.push(LikedProduct::from(product.as_ref())),
            None => tracing::warn!(product_id = %id, "Liked product not in catalog, ignoring"),
        }
    }

    let mut preferences = Preferences {
        categories: args.categories.clone(),
        brands: args.brands.clone(),
        ..Default::default()
    };
    if let Some(ref range) = args.price_range {
        preferences.price_range = range.clone();
    }

    Ok(RecommendationRequest {
        preferences,
        liked_products: liked,
        browsing_history: vec![],
    })
}

fn read_request_body(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read from stdin")?;
        return Ok(body);
    }

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))
}
