//! Domain models and value objects

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Free-text description; its first clause feeds explanations
    #[serde(default)]
    pub description: String,
    /// Price, NaN when the catalog record carried a non-numeric value
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: f64,
    /// Category name (e.g. "Electronics")
    #[serde(default)]
    pub category: String,
    /// Brand name
    #[serde(default)]
    pub brand: String,
    /// Optional image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Optional average rating
    #[serde(
        default,
        deserialize_with = "lenient::rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<f64>,
}

impl Product {
    /// The product price when it is a usable number
    pub fn numeric_price(&self) -> Option<f64> {
        self.price.is_finite().then_some(self.price)
    }
}

/// A product the user already expressed interest in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikedProduct {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl From<&Product> for LikedProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: Some(product.brand.clone()).filter(|b| !b.is_empty()),
            price: product.numeric_price(),
        }
    }
}

/// Stated user preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Raw price-range expression ("all", "20-40", "50+", "35")
    #[serde(
        rename = "priceRange",
        default = "default_price_range",
        deserialize_with = "lenient::string"
    )]
    pub price_range: String,
    /// Preferred categories, empty means no restriction
    #[serde(default, deserialize_with = "lenient::unique_strings")]
    pub categories: Vec<String>,
    /// Preferred brands, empty means no restriction
    #[serde(default, deserialize_with = "lenient::unique_strings")]
    pub brands: Vec<String>,
}

fn default_price_range() -> String {
    "all".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            price_range: default_price_range(),
            categories: vec![],
            brands: vec![],
        }
    }
}

/// Inbound recommendation request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(rename = "likedProducts", default)]
    pub liked_products: Vec<LikedProduct>,
    /// Legacy field: product ids the user browsed, used when `liked_products` is empty
    #[serde(default)]
    pub browsing_history: Vec<String>,
}

/// A single recommended product with its explanation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub product: Arc<Product>,
    pub explanation: String,
}

/// Response envelope, always this shape
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

impl RecommendationResponse {
    pub fn new(recommendations: Vec<Recommendation>) -> Self {
        Self { recommendations }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// A single pick returned by an external recommendation generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPick {
    #[serde(deserialize_with = "lenient::string")]
    pub product_id: String,
    #[serde(default)]
    pub explanation: String,
}

/// Basic type coercion for loosely typed JSON inputs
mod lenient {
    use super::*;
    use serde_json::Value;

    /// Accept a string or a number, rendering numbers as text
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            other => Err(serde::de::Error::custom(format!(
                "expected string, found {other}"
            ))),
        }
    }

    /// Accept a number or numeric string; anything else becomes NaN
    pub fn price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let price = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().trim_start_matches('$').parse::<f64>().ok(),
            _ => None,
        };
        Ok(price.filter(|p| p.is_finite()).unwrap_or(f64::NAN))
    }

    /// Accept a number or numeric string; anything else is no rating
    pub fn rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let rating = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(rating.filter(|r| r.is_finite()))
    }

    /// A list of strings, de-duplicated in first-seen order
    pub fn unique_strings<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
        let mut out: Vec<String> = Vec::with_capacity(raw.len());
        for item in raw {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_coerces_loose_fields() {
        let product: Product = serde_json::from_str(
            r#"{"id": 7, "name": "Mug", "price": "12.50", "category": "Home"}"#,
        )
        .unwrap();

        assert_eq!(product.id, "7");
        assert_eq!(product.price, 12.5);
        assert_eq!(product.brand, "");
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_non_numeric_price_is_not_usable() {
        let product: Product =
            serde_json::from_str(r#"{"id": "p1", "name": "Mug", "price": "call us"}"#).unwrap();

        assert!(product.numeric_price().is_none());
    }

    #[test]
    fn test_product_tolerates_missing_name_and_loose_rating() {
        let product: Product = serde_json::from_str(
            r#"{"id": "p2", "price": 10, "rating": "4.5"}"#,
        )
        .unwrap();
        assert_eq!(product.name, "");
        assert_eq!(product.rating, Some(4.5));

        let product: Product =
            serde_json::from_str(r#"{"id": "p3", "name": "Mug", "rating": "great"}"#).unwrap();
        assert_eq!(product.rating, None);
    }

    #[test]
    fn test_request_defaults() {
        let request: RecommendationRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(request.preferences.price_range, "all");
        assert!(request.liked_products.is_empty());
        assert!(request.browsing_history.is_empty());
    }

    #[test]
    fn test_request_camel_case_fields() {
        let request: RecommendationRequest = serde_json::from_str(
            r#"{
                "preferences": {"priceRange": 50, "categories": ["Home", "Home", "Sports"]},
                "likedProducts": [{"id": "a", "name": "A", "category": "Home"}]
            }"#,
        )
        .unwrap();

        assert_eq!(request.preferences.price_range, "50");
        assert_eq!(request.preferences.categories, vec!["Home", "Sports"]);
        assert_eq!(request.liked_products[0].brand, None);
    }
}
