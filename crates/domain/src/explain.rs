//! Explanation templates

use crate::model::{LikedProduct, Product};

/// Which sentence to build for a recommendation
#[derive(Debug, Clone, Copy)]
pub enum Explanation<'a> {
    /// "Since you liked X, you'll love Y for its <feature>"
    LikedMatch(&'a LikedProduct),
    /// "Based on your interest in <category>, you'll love Y for its <feature>"
    CategoryInterest(&'a str),
    /// "Since you liked X, you'll love Y for its premium <brand> quality"
    PremiumBrand(&'a LikedProduct),
    /// "Since you liked X, you'll love Y to complement it with <feature>"
    Complement(&'a LikedProduct),
    /// "Based on your interests, you'll love Y for its <feature>"
    General,
}

impl Explanation<'_> {
    pub fn render(&self, product: &Product) -> String {
        let feature = feature_of(product);
        match self {
            Explanation::LikedMatch(liked) => format!(
                "Since you liked {}, you'll love {} for its {}",
                liked.name, product.name, feature
            ),
            Explanation::CategoryInterest(category) => format!(
                "Based on your interest in {}, you'll love {} for its {}",
                category, product.name, feature
            ),
            Explanation::PremiumBrand(liked) => format!(
                "Since you liked {}, you'll love {} for its premium {} quality",
                liked.name, product.name, product.brand
            ),
            Explanation::Complement(liked) => format!(
                "Since you liked {}, you'll love {} to complement it with {}",
                liked.name, product.name, feature
            ),
            Explanation::General => format!(
                "Based on your interests, you'll love {} for its {}",
                product.name, feature
            ),
        }
    }
}

/// First comma-separated clause of the description, lower-cased
pub fn feature_of(product: &Product) -> String {
    product
        .description
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
