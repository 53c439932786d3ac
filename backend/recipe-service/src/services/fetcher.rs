use tracing::{debug, warn};

use crate::error::{AppError, Result};
use crate::models::Review;
use crate::store::SharedStore;

/// Reads a recipe's reviews from the remote store.
///
/// No retries: a failed read surfaces as `DataUnavailable` and the caller
/// decides what to do with it.
#[derive(Clone)]
pub struct RatingFetcher {
    store: SharedStore,
}

impl RatingFetcher {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub async fn fetch_reviews(&self, recipe_id: &str) -> Result<Vec<Review>> {
        if recipe_id.trim().is_empty() {
            return Err(AppError::InvalidInput("recipe id must not be empty".into()));
        }

        let reviews = self
            .store
            .get_reviews_by_recipe_id(recipe_id)
            .await
            .map_err(|e| {
                warn!(recipe_id, error = %e, "Failed to fetch reviews");
                AppError::from(e)
            })?;

        let reviews: Vec<Review> = reviews
            .into_iter()
            .filter(|review| review.recipe_id == recipe_id)
            .collect();

        debug!(recipe_id, count = reviews.len(), "Fetched reviews");
        Ok(reviews)
    }
}
