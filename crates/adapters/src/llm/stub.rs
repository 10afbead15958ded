//! Stub generator for testing and offline mode

use async_trait::async_trait;
use product_recs_domain::{GenerateError, GenerateInput, GeneratedPick, RecommendationGenerator};

/// Stub generator that returns configurable responses
pub struct StubGenerator {
    picks: Option<Vec<GeneratedPick>>,
    error: Option<GenerateError>,
}

impl StubGenerator {
    /// Create a stub that returns a specific list of picks
    pub fn with_picks(picks: Vec<GeneratedPick>) -> Self {
        Self {
            picks: Some(picks),
            error: None,
        }
    }

    /// Create a stub that always returns an error
    pub fn with_error(error: GenerateError) -> Self {
        Self {
            picks: None,
            error: Some(error),
        }
    }

    /// Create a stub that picks the best-rated products the user has not liked
    pub fn top_rated() -> Self {
        Self {
            picks: None,
            error: None,
        }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::top_rated()
    }
}

#[async_trait]
impl RecommendationGenerator for StubGenerator {
    async fn generate(&self, input: GenerateInput<'_>) -> Result<Vec<GeneratedPick>, GenerateError> {
        if let Some(ref error) = self.error {
            return Err(error.clone());
        }

        if let Some(ref picks) = self.picks {
            return Ok(picks.clone());
        }

        let mut candidates: Vec<_> = input
            .catalog
            .iter()
            .filter(|p| !input.liked.iter().any(|l| l.id == p.id))
            .collect();
        // Stable sort keeps catalog order among equal ratings
        candidates.sort_by(|a, b| {
            b.rating
                .unwrap_or(0.0)
                .total_cmp(&a.rating.unwrap_or(0.0))
        });

        Ok(candidates
            .into_iter()
            .take(3)
            .map(|p| GeneratedPick {
                product_id: p.id.clone(),
                explanation: format!("A top rated pick in {}: {}", p.category, p.name),
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}
