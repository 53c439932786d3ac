pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

pub use catalog::{CategoryFilter, RecipeCatalog};
pub use config::Config;
pub use context::SessionContext;
pub use error::{AppError, Result};
pub use services::{FavoritesService, RatingFetcher, ReviewService, TrendingSelector};
pub use state::AppState;
