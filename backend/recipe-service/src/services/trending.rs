//! Trending selection
//!
//! Rates every catalog recipe, keeps the ones at or above a threshold, sorts
//! them by average rating (highest first) and keeps the top N. Recipes with
//! equal averages stay in catalog order.
//!
//! A failed review fetch only affects its own recipe: it is logged and the
//! recipe is treated as having no reviews, so one bad read never sinks the
//! whole list.
use futures::future::join_all;
use tracing::{debug, info, warn};

use super::aggregator::aggregate;
use super::fetcher::RatingFetcher;
use crate::config::{FetchStrategy, TrendingConfig};
use crate::models::{AggregateRating, RatedRecipe, Recipe, RecipeRating};

/// Caller-overridable selection options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendingOptions {
    /// Minimum inclusive average rating
    pub threshold: f64,
    /// Maximum number of recipes returned
    pub limit: usize,
}

impl Default for TrendingOptions {
    fn default() -> Self {
        Self {
            threshold: 4.0,
            limit: 5,
        }
    }
}

impl From<&TrendingConfig> for TrendingOptions {
    fn from(config: &TrendingConfig) -> Self {
        Self {
            threshold: config.threshold,
            limit: config.limit,
        }
    }
}

#[derive(Clone)]
pub struct TrendingSelector {
    fetcher: RatingFetcher,
    strategy: FetchStrategy,
}

impl TrendingSelector {
    pub fn new(fetcher: RatingFetcher, strategy: FetchStrategy) -> Self {
        Self { fetcher, strategy }
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.strategy
    }

    /// Top recipes by average rating
    pub async fn select_trending(
        &self,
        catalog: &[Recipe],
        options: TrendingOptions,
    ) -> Vec<RatedRecipe> {
        let ratings = self.rate_catalog(catalog).await;
        let trending = rank(catalog, &ratings, options);

        info!(
            catalog = catalog.len(),
            threshold = options.threshold,
            limit = options.limit,
            selected = trending.len(),
            "Trending selection completed"
        );

        trending
    }

    /// Average rating of every recipe, in catalog order, for list displays
    pub async fn ratings_map(&self, catalog: &[Recipe]) -> Vec<RecipeRating> {
        let ratings = self.rate_catalog(catalog).await;

        catalog
            .iter()
            .zip(ratings)
            .map(|(recipe, rating)| RecipeRating {
                recipe_id: recipe.id.clone(),
                display: rating.display(),
                rating,
            })
            .collect()
    }

    /// Aggregates of `catalog`, index-aligned with it.
    ///
    /// With the concurrent strategy all fetches are in flight at once; the
    /// joined results keep catalog order regardless of completion order.
    pub async fn rate_catalog(&self, catalog: &[Recipe]) -> Vec<AggregateRating> {
        match self.strategy {
            FetchStrategy::Sequential => {
                let mut ratings = Vec::with_capacity(catalog.len());
                for recipe in catalog {
                    ratings.push(self.rate_recipe(recipe).await);
                }
                ratings
            }
            FetchStrategy::Concurrent => {
                join_all(catalog.iter().map(|recipe| self.rate_recipe(recipe))).await
            }
        }
    }

    async fn rate_recipe(&self, recipe: &Recipe) -> AggregateRating {
        match self.fetcher.fetch_reviews(&recipe.id).await {
            Ok(reviews) => aggregate(&reviews),
            Err(e) => {
                warn!(
                    recipe_id = %recipe.id,
                    error = %e,
                    "Treating recipe as unrated after failed review fetch"
                );
                AggregateRating::Unrated
            }
        }
    }
}

/// Filter, stable sort and truncate.
///
/// `ratings` must be index-aligned with `catalog`.
pub fn rank(
    catalog: &[Recipe],
    ratings: &[AggregateRating],
    options: TrendingOptions,
) -> Vec<RatedRecipe> {
    let mut kept: Vec<RatedRecipe> = catalog
        .iter()
        .zip(ratings)
        .filter(|(_, rating)| rating.meets(options.threshold))
        .filter_map(|(recipe, rating)| match rating {
            AggregateRating::Rated { average, count } => Some(RatedRecipe {
                recipe: recipe.clone(),
                avg_rating: *average,
                review_count: *count,
            }),
            AggregateRating::Unrated => None,
        })
        .collect();

    // sort_by is stable: equal averages keep catalog order
    kept.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating));
    kept.truncate(options.limit);

    debug!(
        kept = kept.len(),
        threshold = options.threshold,
        "Ranked trending candidates"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecipeCategory, RecipeDetails, Review};
    use crate::store::{InMemoryStore, MockRecipeStore, StoreError};
    use std::sync::Arc;
    use std::time::Duration;

    fn recipe(id: &str) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            category: RecipeCategory::Dinner,
            image: String::new(),
            details: RecipeDetails {
                servings: "4".to_string(),
                cook_time: "1 hr".to_string(),
                difficulty: "Easy".to_string(),
            },
            ingredients: vec![],
            instructions: vec![],
            video: None,
        }
    }

    fn review(recipe_id: &str, rating: u8) -> Review {
        Review {
            id: String::new(),
            recipe_id: recipe_id.to_string(),
            user_id: "u1".to_string(),
            rating,
            comment: String::new(),
            date: "06/01/2025".to_string(),
        }
    }

    fn rated(average: f64) -> AggregateRating {
        AggregateRating::Rated { average, count: 2 }
    }

    fn ids(recipes: &[RatedRecipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.recipe.id.as_str()).collect()
    }

    fn selector(store: InMemoryStore, strategy: FetchStrategy) -> TrendingSelector {
        TrendingSelector::new(RatingFetcher::new(Arc::new(store)), strategy)
    }

    #[test]
    fn test_rank_ties_keep_catalog_order() {
        let catalog = vec![recipe("A"), recipe("B"), recipe("C")];
        let ratings = vec![rated(4.5), rated(4.5), rated(4.9)];

        let trending = rank(&catalog, &ratings, TrendingOptions::default());
        assert_eq!(ids(&trending), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_rank_threshold_and_limit() {
        let catalog: Vec<Recipe> = (0..8).map(|i| recipe(&format!("r{}", i))).collect();
        let ratings = vec![
            rated(4.0),
            rated(3.9),
            rated(5.0),
            AggregateRating::Unrated,
            rated(4.2),
            rated(4.8),
            rated(4.1),
            rated(4.6),
        ];

        let trending = rank(&catalog, &ratings, TrendingOptions::default());
        assert_eq!(ids(&trending), vec!["r2", "r5", "r7", "r4", "r6"]);
        assert!(trending.iter().all(|r| r.avg_rating >= 4.0));
    }

    #[test]
    fn test_rank_unrated_excluded_even_with_zero_threshold() {
        let catalog = vec![recipe("new"), recipe("old")];
        let ratings = vec![AggregateRating::Unrated, rated(1.0)];
        let options = TrendingOptions {
            threshold: 0.0,
            limit: 5,
        };

        let trending = rank(&catalog, &ratings, options);
        assert_eq!(ids(&trending), vec!["old"]);
    }

    #[test]
    fn test_rank_threshold_is_inclusive() {
        let catalog = vec![recipe("edge"), recipe("below")];
        let ratings = vec![rated(4.0), rated(3.99)];

        let trending = rank(&catalog, &ratings, TrendingOptions::default());
        assert_eq!(ids(&trending), vec!["edge"]);
    }

    #[test]
    fn test_rank_no_padding_and_empty_catalog() {
        let catalog = vec![recipe("A"), recipe("B")];
        let ratings = vec![rated(4.5), rated(2.0)];
        assert_eq!(rank(&catalog, &ratings, TrendingOptions::default()).len(), 1);

        assert!(rank(&[], &[], TrendingOptions::default()).is_empty());
    }

    fn seeded_store() -> InMemoryStore {
        InMemoryStore::new()
            .with_review(review("A", 5))
            .with_review(review("A", 4))
            .with_review(review("B", 4))
            .with_review(review("B", 5))
            .with_review(review("C", 5))
            .with_review(review("D", 2))
    }

    #[tokio::test]
    async fn test_select_trending_end_to_end() {
        let catalog = vec![recipe("A"), recipe("B"), recipe("C"), recipe("D"), recipe("E")];

        for strategy in [FetchStrategy::Sequential, FetchStrategy::Concurrent] {
            let trending = selector(seeded_store(), strategy)
                .select_trending(&catalog, TrendingOptions::default())
                .await;

            assert_eq!(ids(&trending), vec!["C", "A", "B"], "{:?}", strategy);
            assert_eq!(trending[1].avg_rating, 4.5);
            assert_eq!(trending[1].review_count, 2);
        }
    }

    #[tokio::test]
    async fn test_select_trending_is_idempotent() {
        let catalog = vec![recipe("A"), recipe("B"), recipe("C"), recipe("D")];
        let selector = selector(seeded_store(), FetchStrategy::Concurrent);

        let first = selector
            .select_trending(&catalog, TrendingOptions::default())
            .await;
        let second = selector
            .select_trending(&catalog, TrendingOptions::default())
            .await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_isolated() {
        let mut store = MockRecipeStore::new();
        store
            .expect_get_reviews_by_recipe_id()
            .returning(|recipe_id| match recipe_id {
                "broken" => Err(StoreError::Timeout(Duration::from_millis(100))),
                other => Ok(vec![review(other, 5)]),
            });
        let selector = TrendingSelector::new(
            RatingFetcher::new(Arc::new(store)),
            FetchStrategy::Concurrent,
        );
        let catalog = vec![recipe("A"), recipe("broken"), recipe("B")];

        let trending = selector
            .select_trending(&catalog, TrendingOptions::default())
            .await;
        assert_eq!(ids(&trending), vec!["A", "B"]);

        let ratings = selector.ratings_map(&catalog).await;
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[1].rating, AggregateRating::Unrated);
        assert_eq!(ratings[0].display.as_deref(), Some("5.0"));
    }

    #[tokio::test]
    async fn test_concurrent_results_follow_catalog_not_completion_order() {
        let mut store = MockRecipeStore::new();
        store
            .expect_get_reviews_by_recipe_id()
            .returning(|recipe_id| Ok(vec![review(recipe_id, 5)]));
        let selector = TrendingSelector::new(
            RatingFetcher::new(Arc::new(store)),
            FetchStrategy::Concurrent,
        );
        let catalog: Vec<Recipe> = (0..10).map(|i| recipe(&format!("r{}", i))).collect();

        let trending = selector
            .select_trending(
                &catalog,
                TrendingOptions {
                    threshold: 4.0,
                    limit: 10,
                },
            )
            .await;
        let expected: Vec<String> = (0..10).map(|i| format!("r{}", i)).collect();
        assert_eq!(ids(&trending), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
