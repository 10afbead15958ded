//! Immutable, load-once product catalog

use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::model::Product;

/// The product catalog. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
    by_id: HashMap<String, usize>,
    fingerprint: String,
}

impl Catalog {
    /// Build a catalog, keeping the first record for any repeated id
    pub fn new(products: Vec<Product>) -> Self {
        let mut kept = Vec::with_capacity(products.len());
        let mut by_id = HashMap::with_capacity(products.len());

        for product in products {
            if by_id.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "Duplicate product id in catalog, ignoring");
                continue;
            }
            by_id.insert(product.id.clone(), kept.len());
            kept.push(Arc::new(product));
        }

        let fingerprint = compute_fingerprint(&kept);

        Self {
            products: kept,
            by_id,
            fingerprint,
        }
    }

    /// An empty catalog, used when loading fails
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Product>> {
        self.by_id.get(id).map(|&idx| &self.products[idx])
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Arc<Product>> {
        self.products.iter().filter(move |p| p.category == category)
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> BTreeSet<&str> {
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// SHA-256 over ids, prices and categories in catalog order
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn compute_fingerprint(products: &[Arc<Product>]) -> String {
    let mut hasher = Sha256::new();
    for product in products {
        hasher.update(product.id.as_bytes());
        hasher.update(product.price.to_bits().to_le_bytes());
        hasher.update(product.category.as_bytes());
        hasher.update(product.brand.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
