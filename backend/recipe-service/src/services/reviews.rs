use chrono::{Local, NaiveDate};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::fetcher::RatingFetcher;
use crate::catalog::RecipeCatalog;
use crate::context::SessionContext;
use crate::error::{AppError, Result};
use crate::models::{NewReview, Review, ReviewAuthor, ReviewWithAuthor};

/// Display format of review dates (MM/DD/YYYY)
pub const REVIEW_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Clone)]
pub struct ReviewService {
    fetcher: RatingFetcher,
    catalog: Arc<RecipeCatalog>,
}

impl ReviewService {
    pub fn new(fetcher: RatingFetcher, catalog: Arc<RecipeCatalog>) -> Self {
        Self { fetcher, catalog }
    }

    pub async fn publish(
        &self,
        session: &SessionContext,
        recipe_id: &str,
        new_review: NewReview,
    ) -> Result<Review> {
        self.publish_on(session, recipe_id, new_review, Local::now().date_naive())
            .await
    }

    /// Publishes a review stamped with `date`
    pub async fn publish_on(
        &self,
        session: &SessionContext,
        recipe_id: &str,
        new_review: NewReview,
        date: NaiveDate,
    ) -> Result<Review> {
        let user_id = session.require_user("publish a review")?;
        if !self.catalog.contains(recipe_id) {
            return Err(AppError::NotFound(format!("recipe {}", recipe_id)));
        }

        let new_review = NewReview {
            comment: new_review.comment.trim().to_string(),
            ..new_review
        };
        new_review.validate()?;

        let mut review = Review {
            id: String::new(),
            recipe_id: recipe_id.to_string(),
            user_id: user_id.to_string(),
            rating: new_review.rating,
            comment: new_review.comment,
            date: date.format(REVIEW_DATE_FORMAT).to_string(),
        };

        review.id = self
            .fetcher
            .store()
            .push_review(review.clone())
            .await
            .map_err(|e| {
                warn!(recipe_id, user_id, error = %e, "Failed to publish review");
                AppError::from(e)
            })?;

        info!(
            review_id = %review.id,
            recipe_id,
            user_id,
            rating = review.rating,
            "Review published"
        );
        Ok(review)
    }

    /// Reviews of a recipe labelled with their authors.
    ///
    /// Each distinct author is looked up once, all lookups in flight together.
    /// Missing profiles and failed lookups fall back to "Anonymous".
    pub async fn reviews_with_authors(&self, recipe_id: &str) -> Result<Vec<ReviewWithAuthor>> {
        let reviews = self.fetcher.fetch_reviews(recipe_id).await?;

        let user_ids: Vec<&str> = reviews
            .iter()
            .map(|review| review.user_id.as_str())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let store = self.fetcher.store();
        let lookups = join_all(user_ids.iter().map(|user_id| async move {
            let author = match store.get_user_by_id(user_id).await {
                Ok(Some(profile)) => ReviewAuthor::from(profile),
                Ok(None) => ReviewAuthor::anonymous(),
                Err(e) => {
                    warn!(user_id, error = %e, "Failed to fetch review author");
                    ReviewAuthor::anonymous()
                }
            };
            (user_id.to_string(), author)
        }))
        .await;
        let authors: HashMap<String, ReviewAuthor> = lookups.into_iter().collect();

        Ok(reviews
            .into_iter()
            .map(|review| {
                let author = authors
                    .get(&review.user_id)
                    .cloned()
                    .unwrap_or_else(ReviewAuthor::anonymous);
                ReviewWithAuthor { review, author }
            })
            .collect())
    }
}
