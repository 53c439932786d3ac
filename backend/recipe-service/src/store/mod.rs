//! Remote store collaborator.
//!
//! Reviews, user profiles and favorite marks are owned by a hosted store; this
//! service only queries them and forwards the few writes the app makes
//! (publishing a review, toggling a favorite). Backends:
//!
//! - [`InMemoryStore`]: process-local maps for development and tests
//! - [`RedisStore`]: hashes and sets in Redis
//! - [`RealtimeDbStore`]: the hosted realtime database's REST API
//!
//! [`TimeoutStore`] wraps any of them so no call waits longer than the
//! configured store timeout.
mod memory;
mod realtime_db;
mod redis_store;
mod timeout;

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::models::{Review, UserProfile};

pub use memory::InMemoryStore;
pub use realtime_db::RealtimeDbStore;
pub use redis_store::RedisStore;
pub use timeout::TimeoutStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed record: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Query interface over the remote key-value/document store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All reviews whose `recipe_id` equals the input, in store order
    async fn get_reviews_by_recipe_id(&self, recipe_id: &str) -> StoreResult<Vec<Review>>;

    async fn get_user_by_id(&self, user_id: &str) -> StoreResult<Option<UserProfile>>;

    /// Recipe ids the user has marked as favorite
    async fn get_favorite_marks(&self, user_id: &str) -> StoreResult<HashSet<String>>;

    /// Stores a new review and returns its id. An empty `review.id` asks the
    /// store to allocate one.
    async fn push_review(&self, review: Review) -> StoreResult<String>;

    async fn set_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()>;

    async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()>;

    async fn is_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<bool>;
}

pub type SharedStore = Arc<dyn RecipeStore>;

/// Opens the configured backend wrapped in the store timeout
pub async fn connect(config: &StoreConfig) -> StoreResult<SharedStore> {
    let timeout = Duration::from_millis(config.timeout_ms);

    let store: SharedStore = match config.backend {
        StoreBackend::Memory => Arc::new(TimeoutStore::new(InMemoryStore::new(), timeout)),
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| StoreError::Unavailable("REDIS_URL is not set".into()))?;
            let redis = RedisStore::connect(url).await?;
            Arc::new(TimeoutStore::new(redis, timeout))
        }
        StoreBackend::RealtimeDb => {
            let url = config
                .realtime_db_url
                .clone()
                .ok_or_else(|| StoreError::Unavailable("REALTIME_DB_URL is not set".into()))?;
            let client = reqwest::Client::builder().timeout(timeout).build()?;
            let realtime_db = RealtimeDbStore::new(client, url, config.realtime_db_auth.clone());
            Arc::new(TimeoutStore::new(realtime_db, timeout))
        }
    };

    Ok(store)
}
