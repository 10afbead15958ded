//! Recommendation use case

use std::sync::Arc;
use std::time::Duration;

use crate::{
    catalog::Catalog,
    complement::ComplementarityMap,
    model::{
        LikedProduct, Preferences, Recommendation, RecommendationRequest, RecommendationResponse,
    },
    ports::{GenerateError, GenerateInput, RecommendationGenerator},
    price::PriceInterval,
    reconcile::reconcile,
    selector::select,
    tier::{available_products, classify},
};

/// Configuration for the recommend use case
#[derive(Debug, Clone)]
pub struct RecommendConfig {
    /// Upper bound on a single generator call
    pub generator_timeout: Duration,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            generator_timeout: Duration::from_secs(30),
        }
    }
}

/// Which path produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendSource {
    Generator,
    Deterministic,
}

/// Use case for recommending products
pub struct RecommendUseCase {
    catalog: Arc<Catalog>,
    complements: ComplementarityMap,
    generator: Option<Arc<dyn RecommendationGenerator>>,
    config: RecommendConfig,
}

impl RecommendUseCase {
    pub fn new(
        catalog: Arc<Catalog>,
        generator: Option<Arc<dyn RecommendationGenerator>>,
        config: RecommendConfig,
    ) -> Self {
        let complements = ComplementarityMap::standard();

        let report = complements.validate(catalog.categories());
        if !report.unmapped.is_empty() {
            tracing::warn!(
                categories = ?report.unmapped,
                "Catalog categories have no complementary pairings"
            );
        }

        Self {
            catalog,
            complements,
            generator,
            config,
        }
    }

    /// Deterministic-only use case with default settings
    pub fn deterministic(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, None, RecommendConfig::default())
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn complements(&self) -> &ComplementarityMap {
        &self.complements
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Recommend products for a request. Never fails: generator problems
    /// fall back to the deterministic selector.
    pub async fn recommend(&self, request: &RecommendationRequest) -> RecommendationResponse {
        let liked = self.resolve_liked(request);
        let (recommendations, source) = self.recommend_for(&liked, &request.preferences).await;

        tracing::info!(
            source = ?source,
            liked_count = liked.len(),
            count = recommendations.len(),
            "Generated recommendations"
        );

        RecommendationResponse::new(recommendations)
    }

    /// Liked products from the request, or synthesized from browsing history
    pub fn resolve_liked(&self, request: &RecommendationRequest) -> Vec<LikedProduct> {
        if !request.liked_products.is_empty() || request.browsing_history.is_empty() {
            return request.liked_products.clone();
        }

        let liked: Vec<LikedProduct> = request
            .browsing_history
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .map(|product| LikedProduct::from(product.as_ref()))
            .collect();

        tracing::debug!(
            history_len = request.browsing_history.len(),
            resolved = liked.len(),
            "Resolved liked products from browsing history"
        );

        liked
    }

    async fn recommend_for(
        &self,
        liked: &[LikedProduct],
        preferences: &Preferences,
    ) -> (Vec<Recommendation>, RecommendSource) {
        if let Some(generator) = &self.generator {
            match self.try_generator(generator.as_ref(), liked, preferences).await {
                Ok(recommendations) if !recommendations.is_empty() => {
                    return (recommendations, RecommendSource::Generator);
                }
                Ok(_) => {
                    tracing::warn!(
                        provider = generator.name(),
                        "Generator produced no usable picks, using deterministic selector"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        provider = generator.name(),
                        error = %e,
                        "Generator failed, using deterministic selector"
                    );
                }
            }
        }

        (
            self.recommend_deterministic(liked, preferences),
            RecommendSource::Deterministic,
        )
    }

    /// Tier the catalog and drain the tiers
    pub fn recommend_deterministic(
        &self,
        liked: &[LikedProduct],
        preferences: &Preferences,
    ) -> Vec<Recommendation> {
        let interval = PriceInterval::parse(&preferences.price_range);
        let buckets = classify(
            self.catalog.products(),
            liked,
            preferences,
            &interval,
            &self.complements,
        );
        select(&buckets, liked, preferences, &self.complements)
    }

    async fn try_generator(
        &self,
        generator: &dyn RecommendationGenerator,
        liked: &[LikedProduct],
        preferences: &Preferences,
    ) -> Result<Vec<Recommendation>, GenerateError> {
        let input = GenerateInput {
            liked,
            preferences,
            catalog: self.catalog.products(),
        };

        let picks = tokio::time::timeout(self.config.generator_timeout, generator.generate(input))
            .await
            .map_err(|_| GenerateError::Timeout)??;

        tracing::debug!(picks = picks.len(), "Generator returned picks");

        let interval = PriceInterval::parse(&preferences.price_range);
        let available = available_products(self.catalog.products(), liked, &interval);

        Ok(reconcile(&picks, &self.catalog, liked, &available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GeneratedPick, Product};
    use async_trait::async_trait;

    enum Behavior {
        Picks(Vec<GeneratedPick>),
        Fail,
        Hang,
    }

    struct FakeGenerator {
        behavior: Behavior,
    }

    #[async_trait]
    impl RecommendationGenerator for FakeGenerator {
        async fn generate(
            &self,
            _input: GenerateInput<'_>,
        ) -> Result<Vec<GeneratedPick>, GenerateError> {
            match &self.behavior {
                Behavior::Picks(picks) => Ok(picks.clone()),
                Behavior::Fail => Err(GenerateError::Api("boom".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(vec![])
                }
            }
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    fn product(id: &str, category: &str, brand: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            description: format!("Handy {id}, compact"),
            price,
            category: category.to_string(),
            brand: brand.to_string(),
            image: None,
            rating: None,
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(vec![
            product("A", "Electronics", "Sony", 50.0),
            product("B", "Accessories", "Belkin", 30.0),
            product("C", "Sports", "Nike", 20.0),
            product("D", "Home", "Ikea", 45.0),
        ]))
    }

    fn liked_a_request() -> RecommendationRequest {
        RecommendationRequest {
            liked_products: vec![LikedProduct {
                id: "A".to_string(),
                name: "Product A".to_string(),
                category: "Electronics".to_string(),
                brand: Some("Sony".to_string()),
                price: Some(50.0),
            }],
            ..Default::default()
        }
    }

    fn ids(response: &RecommendationResponse) -> Vec<&str> {
        response
            .recommendations
            .iter()
            .map(|r| r.product.id.as_str())
            .collect()
    }

    fn with_generator(behavior: Behavior, timeout: Duration) -> RecommendUseCase {
        RecommendUseCase::new(
            catalog(),
            Some(Arc::new(FakeGenerator { behavior })),
            RecommendConfig {
                generator_timeout: timeout,
            },
        )
    }

    #[tokio::test]
    async fn test_deterministic_path() {
        let usecase = RecommendUseCase::deterministic(catalog());

        let response = usecase.recommend(&liked_a_request()).await;

        assert_eq!(ids(&response), vec!["B", "D", "C"]);
    }

    #[tokio::test]
    async fn test_deterministic_path_is_idempotent() {
        let usecase = RecommendUseCase::deterministic(catalog());
        let request = liked_a_request();

        let first = usecase.recommend(&request).await;
        let second = usecase.recommend(&request).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_browsing_history_resolves_liked() {
        let usecase = RecommendUseCase::deterministic(catalog());
        let request = RecommendationRequest {
            browsing_history: vec!["A".to_string(), "missing".to_string()],
            ..Default::default()
        };

        let liked = usecase.resolve_liked(&request);
        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].brand.as_deref(), Some("Sony"));

        let response = usecase.recommend(&request).await;
        assert!(!ids(&response).contains(&"A"));
    }

    #[tokio::test]
    async fn test_liked_products_take_precedence_over_history() {
        let usecase = RecommendUseCase::deterministic(catalog());
        let mut request = liked_a_request();
        request.browsing_history = vec!["C".to_string()];

        let liked = usecase.resolve_liked(&request);

        assert_eq!(liked.len(), 1);
        assert_eq!(liked[0].id, "A");
    }

    #[tokio::test]
    async fn test_generator_picks_are_used() {
        let usecase = with_generator(
            Behavior::Picks(vec![
                GeneratedPick {
                    product_id: "C".to_string(),
                    explanation: "Get moving".to_string(),
                },
                GeneratedPick {
                    product_id: "B".to_string(),
                    explanation: "Pairs well".to_string(),
                },
            ]),
            Duration::from_secs(5),
        );

        let response = usecase.recommend(&liked_a_request()).await;

        assert_eq!(ids(&response), vec!["C", "B", "D"]);
        assert_eq!(response.recommendations[0].explanation, "Get moving");
    }

    #[tokio::test]
    async fn test_generator_error_falls_back() {
        let usecase = with_generator(Behavior::Fail, Duration::from_secs(5));

        let response = usecase.recommend(&liked_a_request()).await;

        assert_eq!(ids(&response), vec!["B", "D", "C"]);
    }

    #[tokio::test]
    async fn test_generator_timeout_falls_back() {
        let usecase = with_generator(Behavior::Hang, Duration::from_millis(20));

        let response = usecase.recommend(&liked_a_request()).await;

        assert_eq!(ids(&response), vec!["B", "D", "C"]);
    }

    #[tokio::test]
    async fn test_empty_catalog_gives_empty_response() {
        let usecase = RecommendUseCase::deterministic(Arc::new(Catalog::empty()));

        let response = usecase.recommend(&RecommendationRequest::default()).await;

        assert!(response.recommendations.is_empty());
    }
}
