use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecipeStore, StoreResult};
use crate::models::{Review, UserProfile};

/// Process-local store.
///
/// Reviews are kept per recipe in insertion order. The `with_*` builders seed
/// data before the store is shared.
#[derive(Default)]
pub struct InMemoryStore {
    reviews: RwLock<HashMap<String, Vec<Review>>>,
    users: RwLock<HashMap<String, UserProfile>>,
    favorites: RwLock<HashMap<String, HashSet<String>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_review(mut self, mut review: Review) -> Self {
        if review.id.is_empty() {
            review.id = Uuid::new_v4().to_string();
        }
        self.reviews
            .get_mut()
            .entry(review.recipe_id.clone())
            .or_default()
            .push(review);
        self
    }

    pub fn with_user(mut self, user_id: &str, profile: UserProfile) -> Self {
        self.users.get_mut().insert(user_id.to_string(), profile);
        self
    }

    pub fn with_favorite(mut self, user_id: &str, recipe_id: &str) -> Self {
        self.favorites
            .get_mut()
            .entry(user_id.to_string())
            .or_default()
            .insert(recipe_id.to_string());
        self
    }
}

#[async_trait]
impl RecipeStore for InMemoryStore {
    async fn get_reviews_by_recipe_id(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(recipe_id).cloned().unwrap_or_default())
    }

    async fn get_user_by_id(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn get_favorite_marks(&self, user_id: &str) -> StoreResult<HashSet<String>> {
        let favorites = self.favorites.read().await;
        Ok(favorites.get(user_id).cloned().unwrap_or_default())
    }

    async fn push_review(&self, mut review: Review) -> StoreResult<String> {
        if review.id.is_empty() {
            review.id = Uuid::new_v4().to_string();
        }
        let id = review.id.clone();

        self.reviews
            .write()
            .await
            .entry(review.recipe_id.clone())
            .or_default()
            .push(review);

        Ok(id)
    }

    async fn set_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        self.favorites
            .write()
            .await
            .entry(user_id.to_string())
            .or_default()
            .insert(recipe_id.to_string());
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        if let Some(marks) = self.favorites.write().await.get_mut(user_id) {
            marks.remove(recipe_id);
        }
        Ok(())
    }

    async fn is_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<bool> {
        let favorites = self.favorites.read().await;
        Ok(favorites
            .get(user_id)
            .is_some_and(|marks| marks.contains(recipe_id)))
    }
}
