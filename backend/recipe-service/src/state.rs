use std::sync::Arc;

use crate::catalog::RecipeCatalog;
use crate::config::TrendingConfig;
use crate::services::{
    FavoritesService, RatingFetcher, ReviewService, TrendingOptions, TrendingSelector,
};
use crate::store::SharedStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<RecipeCatalog>,
    pub fetcher: RatingFetcher,
    pub trending: TrendingSelector,
    pub reviews: ReviewService,
    pub favorites: FavoritesService,
    pub trending_defaults: TrendingOptions,
}

impl AppState {
    pub fn new(catalog: RecipeCatalog, store: SharedStore, trending: &TrendingConfig) -> Self {
        let catalog = Arc::new(catalog);
        let fetcher = RatingFetcher::new(store.clone());

        Self {
            trending: TrendingSelector::new(fetcher.clone(), trending.fetch_strategy),
            reviews: ReviewService::new(fetcher.clone(), catalog.clone()),
            favorites: FavoritesService::new(store),
            trending_defaults: TrendingOptions::from(trending),
            fetcher,
            catalog,
        }
    }
}
