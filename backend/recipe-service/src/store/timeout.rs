use async_trait::async_trait;
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use super::{RecipeStore, StoreError, StoreResult};
use crate::models::{Review, UserProfile};

/// Enforces a time limit on every call to the wrapped store
pub struct TimeoutStore<S> {
    inner: S,
    duration: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, duration: Duration) -> Self {
        Self { inner, duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Execute a store call with a timeout; elapsed calls become `StoreError::Timeout`
pub async fn with_timeout<F, T>(duration: Duration, operation: &str, future: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, ?duration, "Store call timed out");
            Err(StoreError::Timeout(duration))
        }
    }
}

#[async_trait]
impl<S: RecipeStore> RecipeStore for TimeoutStore<S> {
    async fn get_reviews_by_recipe_id(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        with_timeout(
            self.duration,
            "get_reviews_by_recipe_id",
            self.inner.get_reviews_by_recipe_id(recipe_id),
        )
        .await
    }

    async fn get_user_by_id(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        with_timeout(
            self.duration,
            "get_user_by_id",
            self.inner.get_user_by_id(user_id),
        )
        .await
    }

    async fn get_favorite_marks(&self, user_id: &str) -> StoreResult<HashSet<String>> {
        with_timeout(
            self.duration,
            "get_favorite_marks",
            self.inner.get_favorite_marks(user_id),
        )
        .await
    }

    async fn push_review(&self, review: Review) -> StoreResult<String> {
        with_timeout(self.duration, "push_review", self.inner.push_review(review)).await
    }

    async fn set_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        with_timeout(
            self.duration,
            "set_favorite",
            self.inner.set_favorite(user_id, recipe_id),
        )
        .await
    }

    async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        with_timeout(
            self.duration,
            "remove_favorite",
            self.inner.remove_favorite(user_id, recipe_id),
        )
        .await
    }

    async fn is_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<bool> {
        with_timeout(
            self.duration,
            "is_favorite",
            self.inner.is_favorite(user_id, recipe_id),
        )
        .await
    }
}
