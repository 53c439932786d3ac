use std::collections::HashSet;
use tracing::info;

use crate::catalog::RecipeCatalog;
use crate::context::SessionContext;
use crate::error::{AppError, Result};
use crate::models::{FavoriteState, Recipe};
use crate::store::SharedStore;

/// Catalog recipes whose id is marked favorite, in catalog order
pub fn filter_favorites(catalog: &[Recipe], favorite_marks: &HashSet<String>) -> Vec<Recipe> {
    catalog
        .iter()
        .filter(|recipe| favorite_marks.contains(&recipe.id))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct FavoritesService {
    store: SharedStore,
}

impl FavoritesService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The session user's favorites view; empty when logged out
    pub async fn favorites(
        &self,
        session: &SessionContext,
        catalog: &RecipeCatalog,
    ) -> Result<Vec<Recipe>> {
        let Some(user_id) = session.user_id() else {
            return Ok(Vec::new());
        };

        let marks = self.store.get_favorite_marks(user_id).await?;
        Ok(filter_favorites(catalog.all(), &marks))
    }

    pub async fn is_favorite(&self, session: &SessionContext, recipe_id: &str) -> Result<bool> {
        match session.user_id() {
            Some(user_id) => Ok(self.store.is_favorite(user_id, recipe_id).await?),
            None => Ok(false),
        }
    }

    /// Flips the favorite mark and returns the new state
    pub async fn toggle_favorite(
        &self,
        session: &SessionContext,
        catalog: &RecipeCatalog,
        recipe_id: &str,
    ) -> Result<FavoriteState> {
        let user_id = session.require_user("favorite recipes")?;
        if !catalog.contains(recipe_id) {
            return Err(AppError::NotFound(format!("recipe {}", recipe_id)));
        }

        let is_favorite = if self.store.is_favorite(user_id, recipe_id).await? {
            self.store.remove_favorite(user_id, recipe_id).await?;
            false
        } else {
            self.store.set_favorite(user_id, recipe_id).await?;
            true
        };

        info!(user_id, recipe_id, is_favorite, "Favorite toggled");
        Ok(FavoriteState {
            recipe_id: recipe_id.to_string(),
            is_favorite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, MockRecipeStore, StoreError};
    use std::sync::Arc;

    fn catalog() -> RecipeCatalog {
        RecipeCatalog::sample().unwrap()
    }

    #[test]
    fn test_filter_favorites_empty_and_full() {
        let catalog = catalog();
        assert!(filter_favorites(catalog.all(), &HashSet::new()).is_empty());

        let all: HashSet<String> = catalog.all().iter().map(|r| r.id.clone()).collect();
        assert_eq!(filter_favorites(catalog.all(), &all), catalog.all().to_vec());
    }

    #[test]
    fn test_filter_favorites_keeps_catalog_order_and_ignores_unknown_ids() {
        let catalog = catalog();
        let marks: HashSet<String> = ["leche-flan", "tapsilog", "not-a-recipe"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let ids: Vec<String> = filter_favorites(catalog.all(), &marks)
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["tapsilog", "leche-flan"]);
    }

    #[tokio::test]
    async fn test_logged_out_session_sees_no_favorites() {
        let service = FavoritesService::new(Arc::new(InMemoryStore::new()));
        let session = SessionContext::anonymous();

        assert!(service.favorites(&session, &catalog()).await.unwrap().is_empty());
        assert!(!service.is_favorite(&session, "tapsilog").await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_favorite() {
        let service = FavoritesService::new(Arc::new(InMemoryStore::new()));
        let session = SessionContext::logged_in("uid-1");
        let catalog = catalog();

        let on = service
            .toggle_favorite(&session, &catalog, "halo-halo")
            .await
            .unwrap();
        assert!(on.is_favorite);
        assert_eq!(service.favorites(&session, &catalog).await.unwrap().len(), 1);

        let off = service
            .toggle_favorite(&session, &catalog, "halo-halo")
            .await
            .unwrap();
        assert!(!off.is_favorite);
        assert!(service.favorites(&session, &catalog).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_requires_login_and_known_recipe() {
        let service = FavoritesService::new(Arc::new(InMemoryStore::new()));
        let catalog = catalog();

        let anonymous = service
            .toggle_favorite(&SessionContext::anonymous(), &catalog, "halo-halo")
            .await;
        assert!(matches!(anonymous, Err(AppError::Unauthenticated(_))));

        let unknown = service
            .toggle_favorite(&SessionContext::logged_in("uid-1"), &catalog, "pizza")
            .await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockRecipeStore::new();
        store
            .expect_get_favorite_marks()
            .returning(|_| Err(StoreError::Unavailable("offline".into())));
        let service = FavoritesService::new(Arc::new(store));

        let result = service
            .favorites(&SessionContext::logged_in("uid-1"), &catalog())
            .await;
        assert!(matches!(result, Err(AppError::DataUnavailable(_))));
    }
}
