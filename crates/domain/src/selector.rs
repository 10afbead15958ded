//! Recommendation selection: drains tier buckets into a short list

use std::collections::HashSet;
use std::sync::Arc;

use crate::complement::ComplementarityMap;
use crate::explain::Explanation;
use crate::model::{LikedProduct, Preferences, Product, Recommendation};
use crate::tier::{RelevanceTier, TierBuckets};

/// Number of recommendations returned per request
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Cap on picks from the preferred-category bucket before moving on
pub const PREFERRED_CATEGORY_LIMIT: usize = 2;

/// How to pick the liked product an explanation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorRule {
    /// A liked product in the same category
    SameCategory,
    /// A liked product of the same brand
    SameBrand,
    /// A liked product whose category this product complements
    ComplementedBy,
    /// The first liked product, unconditionally
    FirstLiked,
}

/// Find the explanation anchor for `product`, trying `rules` in order
pub fn find_anchor<'l>(
    product: &Product,
    liked: &'l [LikedProduct],
    rules: &[AnchorRule],
    map: &ComplementarityMap,
) -> Option<&'l LikedProduct> {
    rules.iter().find_map(|rule| match rule {
        AnchorRule::SameCategory => liked.iter().find(|l| l.category == product.category),
        AnchorRule::SameBrand => liked
            .iter()
            .find(|l| l.brand.as_deref() == Some(product.brand.as_str())),
        AnchorRule::ComplementedBy => liked
            .iter()
            .find(|l| map.is_complement(&l.category, &product.category)),
        AnchorRule::FirstLiked => liked.first(),
    })
}

/// Picks made so far, with id de-duplication
struct Selection {
    picks: Vec<Recommendation>,
    chosen: HashSet<String>,
}

impl Selection {
    fn new() -> Self {
        Self {
            picks: Vec::with_capacity(MAX_RECOMMENDATIONS),
            chosen: HashSet::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.picks.len() >= MAX_RECOMMENDATIONS
    }

    fn contains(&self, product: &Product) -> bool {
        self.chosen.contains(&product.id)
    }

    fn push(&mut self, product: &Arc<Product>, explanation: Explanation<'_>) {
        if self.contains(product) {
            return;
        }
        self.chosen.insert(product.id.clone());
        self.picks.push(Recommendation {
            explanation: explanation.render(product),
            product: Arc::clone(product),
        });
    }

    fn finish(mut self) -> Vec<Recommendation> {
        self.picks.truncate(MAX_RECOMMENDATIONS);
        self.picks
    }
}

/// Assemble up to [`MAX_RECOMMENDATIONS`] recommendations from tiered products.
///
/// Buckets are drained in priority order:
/// 1. up to two preferred-category products
/// 2. one same-category product, only if a liked product shares its category
/// 3. one same-brand product, only if a liked product shares its brand
/// 4. complementary products while liked products exist to anchor them
/// 5. anything left, in tier order, until the list is full
///
/// An empty result means nothing was available.
pub fn select(
    buckets: &TierBuckets,
    liked: &[LikedProduct],
    preferences: &Preferences,
    map: &ComplementarityMap,
) -> Vec<Recommendation> {
    let mut selection = Selection::new();

    if let Some(first_preferred) = preferences.categories.first() {
        for product in buckets
            .get(RelevanceTier::PreferredCategory)
            .iter()
            .take(PREFERRED_CATEGORY_LIMIT)
        {
            let explanation = match find_anchor(product, liked, &[AnchorRule::SameCategory], map) {
                Some(anchor) => Explanation::LikedMatch(anchor),
                None => Explanation::CategoryInterest(first_preferred),
            };
            selection.push(product, explanation);
        }
    }

    if !selection.is_full() {
        if let Some(product) = buckets.get(RelevanceTier::SameCategoryAsLiked).first() {
            if let Some(anchor) = find_anchor(product, liked, &[AnchorRule::SameCategory], map) {
                selection.push(product, Explanation::LikedMatch(anchor));
            }
        }
    }

    if !selection.is_full() {
        if let Some(product) = buckets.get(RelevanceTier::SameBrandAsLikedOrPreferred).first() {
            if let Some(anchor) = find_anchor(product, liked, &[AnchorRule::SameBrand], map) {
                selection.push(product, Explanation::PremiumBrand(anchor));
            }
        }
    }

    // Without liked products nothing can anchor a complement; leave them for backfill
    if !liked.is_empty() {
        for product in buckets.get(RelevanceTier::Complementary) {
            if selection.is_full() {
                break;
            }
            let rules = [AnchorRule::ComplementedBy, AnchorRule::FirstLiked];
            if let Some(anchor) = find_anchor(product, liked, &rules, map) {
                selection.push(product, Explanation::Complement(anchor));
            }
        }
    }

    let backfill_rules = [
        AnchorRule::SameCategory,
        AnchorRule::SameBrand,
        AnchorRule::FirstLiked,
    ];
    'backfill: for (_, bucket) in buckets.iter() {
        for product in bucket {
            if selection.is_full() {
                break 'backfill;
            }
            if selection.contains(product) {
                continue;
            }
            let explanation = match find_anchor(product, liked, &backfill_rules, map) {
                Some(anchor) => Explanation::CategoryInterest(&anchor.category),
                None => Explanation::General,
            };
            selection.push(product, explanation);
        }
    }

    selection.finish()
}
