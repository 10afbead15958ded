//! product-recs adapters crate
//!
//! This crate contains infrastructure adapters implementing the domain ports:
//! - `catalog`: JSON file catalog source
//! - `llm`: recommendation generators (OpenAI, Anthropic, Ollama, stub)

mod catalog_fs;

pub mod llm;

/// Re-exports for catalog adapters
pub mod catalog {
    pub use crate::catalog_fs::{FsCatalogSource, parse_catalog};
}
