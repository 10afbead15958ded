//! Affinity classification: availability filtering and relevance tiering

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::complement::ComplementarityMap;
use crate::model::{LikedProduct, Preferences, Product};
use crate::price::PriceInterval;

/// Relevance tiers, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceTier {
    PreferredCategory,
    SameCategoryAsLiked,
    SameBrandAsLikedOrPreferred,
    Complementary,
    Other,
}

impl RelevanceTier {
    /// Every tier in priority order
    pub const ALL: [RelevanceTier; 5] = [
        RelevanceTier::PreferredCategory,
        RelevanceTier::SameCategoryAsLiked,
        RelevanceTier::SameBrandAsLikedOrPreferred,
        RelevanceTier::Complementary,
        RelevanceTier::Other,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelevanceTier::PreferredCategory => "preferred_category",
            RelevanceTier::SameCategoryAsLiked => "same_category_as_liked",
            RelevanceTier::SameBrandAsLikedOrPreferred => "same_brand_as_liked_or_preferred",
            RelevanceTier::Complementary => "complementary",
            RelevanceTier::Other => "other",
        }
    }
}

/// Everything the tier predicates look at, precomputed once per request
#[derive(Debug)]
pub struct AffinityProfile<'a> {
    pub preferred_categories: HashSet<&'a str>,
    pub liked_categories: HashSet<&'a str>,
    pub brands: HashSet<&'a str>,
    pub complementary_categories: HashSet<&'static str>,
}

impl<'a> AffinityProfile<'a> {
    pub fn new(
        liked: &'a [LikedProduct],
        preferences: &'a Preferences,
        map: &ComplementarityMap,
    ) -> Self {
        let preferred_categories: HashSet<&str> =
            preferences.categories.iter().map(String::as_str).collect();
        let liked_categories: HashSet<&str> = liked.iter().map(|l| l.category.as_str()).collect();
        let brands = liked
            .iter()
            .filter_map(|l| l.brand.as_deref())
            .chain(preferences.brands.iter().map(String::as_str))
            .filter(|b| !b.is_empty())
            .collect();
        let complementary_categories = map
            .expand(liked_categories.union(&preferred_categories).copied())
            .into_iter()
            .collect();

        Self {
            preferred_categories,
            liked_categories,
            brands,
            complementary_categories,
        }
    }
}

type TierRule = fn(&Product, &AffinityProfile<'_>) -> bool;

fn in_preferred_category(product: &Product, profile: &AffinityProfile<'_>) -> bool {
    profile.preferred_categories.contains(product.category.as_str())
}

fn in_liked_category(product: &Product, profile: &AffinityProfile<'_>) -> bool {
    profile.liked_categories.contains(product.category.as_str())
}

fn has_known_brand(product: &Product, profile: &AffinityProfile<'_>) -> bool {
    profile.brands.contains(product.brand.as_str())
}

fn in_complementary_category(product: &Product, profile: &AffinityProfile<'_>) -> bool {
    profile
        .complementary_categories
        .contains(product.category.as_str())
}

/// Ordered predicate list; the first rule that holds decides the tier
const TIER_RULES: [(RelevanceTier, TierRule); 4] = [
    (RelevanceTier::PreferredCategory, in_preferred_category),
    (RelevanceTier::SameCategoryAsLiked, in_liked_category),
    (RelevanceTier::SameBrandAsLikedOrPreferred, has_known_brand),
    (RelevanceTier::Complementary, in_complementary_category),
];

/// Assign exactly one tier to a product
pub fn tier_for(product: &Product, profile: &AffinityProfile<'_>) -> RelevanceTier {
    TIER_RULES
        .iter()
        .find(|(_, rule)| rule(product, profile))
        .map(|(tier, _)| *tier)
        .unwrap_or(RelevanceTier::Other)
}

/// Products that may be recommended: not liked, priced inside the interval
pub fn available_products(
    catalog: &[Arc<Product>],
    liked: &[LikedProduct],
    interval: &PriceInterval,
) -> Vec<Arc<Product>> {
    let liked_ids: HashSet<&str> = liked.iter().map(|l| l.id.as_str()).collect();

    catalog
        .iter()
        .filter(|p| !liked_ids.contains(p.id.as_str()))
        .filter(|p| p.numeric_price().is_some_and(|price| interval.contains(price)))
        .cloned()
        .collect()
}

/// Available products partitioned by tier, each bucket in catalog order
#[derive(Debug, Clone, Default)]
pub struct TierBuckets {
    buckets: [Vec<Arc<Product>>; 5],
}

impl TierBuckets {
    pub fn get(&self, tier: RelevanceTier) -> &[Arc<Product>] {
        &self.buckets[tier.index()]
    }

    /// Buckets in priority order
    pub fn iter(&self) -> impl Iterator<Item = (RelevanceTier, &[Arc<Product>])> {
        RelevanceTier::ALL
            .into_iter()
            .map(move |tier| (tier, self.get(tier)))
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Bucket sizes in priority order, for logging
    pub fn sizes(&self) -> [usize; 5] {
        [
            self.buckets[0].len(),
            self.buckets[1].len(),
            self.buckets[2].len(),
            self.buckets[3].len(),
            self.buckets[4].len(),
        ]
    }

    fn push(&mut self, tier: RelevanceTier, product: Arc<Product>) {
        self.buckets[tier.index()].push(product);
    }
}

/// Filter the catalog and sort what remains into tiers
pub fn classify(
    catalog: &[Arc<Product>],
    liked: &[LikedProduct],
    preferences: &Preferences,
    interval: &PriceInterval,
    map: &ComplementarityMap,
) -> TierBuckets {
    let profile = AffinityProfile::new(liked, preferences, map);
    let mut buckets = TierBuckets::default();

    for product in available_products(catalog, liked, interval) {
        let tier = tier_for(&product, &profile);
        buckets.push(tier, product);
    }

    tracing::debug!(sizes = ?buckets.sizes(), "Classified available products");

    buckets
}
