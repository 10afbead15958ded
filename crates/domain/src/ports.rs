//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;

use std::sync::Arc;

use crate::model::{GeneratedPick, LikedProduct, Preferences, Product};

/// Error type for catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error in {file}: {message}")]
    Parse { file: String, message: String },
    #[error("Catalog source not found: {0}")]
    NotFound(String),
}

/// Port for loading the product catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load every product record, in source order
    async fn load(&self) -> Result<Vec<Product>, CatalogError>;
}

/// Error type for recommendation generators
#[derive(Debug, Clone, Error)]
pub enum GenerateError {
    #[error("LLM API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Everything a generator sees about one request
#[derive(Debug, Clone, Copy)]
pub struct GenerateInput<'a> {
    pub liked: &'a [LikedProduct],
    pub preferences: &'a Preferences,
    pub catalog: &'a [Arc<Product>],
}

/// Port for an external, free-text recommendation generator
#[async_trait]
pub trait RecommendationGenerator: Send + Sync {
    /// Produce a ranked list of picks for the request
    async fn generate(
        &self,
        input: GenerateInput<'_>,
    ) -> Result<Vec<GeneratedPick>, GenerateError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}
