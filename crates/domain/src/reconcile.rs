//! Reconciles generator output against the catalog

use std::collections::HashSet;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::explain::Explanation;
use crate::model::{GeneratedPick, LikedProduct, Product, Recommendation};
use crate::selector::MAX_RECOMMENDATIONS;

/// Distinct categories wanted before repeats are accepted
const MIN_DISTINCT_CATEGORIES: usize = 2;

/// Turn generator picks into recommendations.
///
/// Picks naming unknown, liked, or already chosen products are dropped, as
/// are products outside `available` (the price-filtered set). While fewer than two categories are covered, a pick repeating a covered
/// category is skipped. Remaining slots are filled from `available`,
/// unused categories first, with the generic explanation.
pub fn reconcile(
    picks: &[GeneratedPick],
    catalog: &Catalog,
    liked: &[LikedProduct],
    available: &[Arc<Product>],
) -> Vec<Recommendation> {
    let liked_ids: HashSet<&str> = liked.iter().map(|l| l.id.as_str()).collect();
    let available_ids: HashSet<&str> = available.iter().map(|p| p.id.as_str()).collect();
    let mut chosen: HashSet<String> = HashSet::new();
    let mut categories: HashSet<String> = HashSet::new();
    let mut recommendations = Vec::with_capacity(MAX_RECOMMENDATIONS);

    for pick in picks {
        if recommendations.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        let product_id = pick.product_id.trim();

        let Some(product) = catalog.get(product_id) else {
            tracing::debug!(product_id = %product_id, "Skipping pick: not in catalog");
            continue;
        };

        if liked_ids.contains(product_id) || chosen.contains(product_id) {
            tracing::debug!(product_id = %product_id, "Skipping pick: liked or repeated");
            continue;
        }

        if !available_ids.contains(product_id) {
            tracing::debug!(product_id = %product_id, "Skipping pick: outside price range");
            continue;
        }

        if categories.contains(&product.category) && categories.len() < MIN_DISTINCT_CATEGORIES {
            tracing::debug!(
                product_id = %product_id,
                category = %product.category,
                "Skipping pick: category already covered"
            );
            continue;
        }

        let explanation = if pick.explanation.trim().is_empty() {
            Explanation::General.render(product)
        } else {
            pick.explanation.trim().to_string()
        };

        chosen.insert(product.id.clone());
        categories.insert(product.category.clone());
        recommendations.push(Recommendation {
            product: Arc::clone(product),
            explanation,
        });
    }

    // Unused categories first, then anything not yet chosen
    for fresh_only in [true, false] {
        for product in available {
            if recommendations.len() >= MAX_RECOMMENDATIONS {
                break;
            }
            if chosen.contains(&product.id) || liked_ids.contains(product.id.as_str()) {
                continue;
            }
            if fresh_only && categories.contains(&product.category) {
                continue;
            }

            chosen.insert(product.id.clone());
            categories.insert(product.category.clone());
            recommendations.push(Recommendation {
                product: Arc::clone(product),
                explanation: Explanation::General.render(product),
            });
        }
    }

    recommendations
}
