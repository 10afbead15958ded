//! Filesystem-based catalog source (JSON array of product records)

use async_trait::async_trait;
use product_recs_domain::{Catalog, CatalogError, CatalogSource, Product};
use std::path::{Path, PathBuf};

/// Reads the product catalog from a JSON file
pub struct FsCatalogSource {
    path: PathBuf,
}

impl FsCatalogSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog, degrading to an empty one on any failure
    pub async fn load_or_empty(&self) -> Catalog {
        match self.load().await {
            Ok(products) => {
                let catalog = Catalog::new(products);
                tracing::info!(
                    path = %self.path.display(),
                    products = catalog.len(),
                    fingerprint = %catalog.fingerprint(),
                    "Loaded product catalog"
                );
                catalog
            }
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to load product catalog, continuing with an empty catalog"
                );
                Catalog::empty()
            }
        }
    }
}

#[async_trait]
impl CatalogSource for FsCatalogSource {
    async fn load(&self) -> Result<Vec<Product>, CatalogError> {
        if !self.path.exists() {
            return Err(CatalogError::NotFound(self.path.display().to_string()));
        }

        let content = tokio::fs::read_to_string(&self.path).await?;

        parse_catalog(&content).map_err(|message| CatalogError::Parse {
            file: self.path.display().to_string(),
            message,
        })
    }
}

/// Parse a JSON array of product records.
///
/// Records are deserialized one at a time; a record that cannot be read as a
/// product is skipped with a warning and the rest are kept.
pub fn parse_catalog(content: &str) -> Result<Vec<Product>, String> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|e| format!("Invalid catalog JSON: {}", e))?;

    let mut products = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Product>(record) {
            Ok(product) => products.push(product),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable catalog record");
            }
        }
    }

    Ok(products)
}
