use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{RecipeStore, StoreResult};
use crate::models::{Review, UserProfile};

/// Redis-backed store.
///
/// Layout:
/// - `reviews:{recipe_id}`: hash, field = review id, value = review JSON
/// - `users:{user_id}`: hash with `username` and optional `avatar`
/// - `favorites:{user_id}`: set of recipe ids
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }

    fn reviews_key(recipe_id: &str) -> String {
        format!("reviews:{}", recipe_id)
    }

    fn user_key(user_id: &str) -> String {
        format!("users:{}", user_id)
    }

    fn favorites_key(user_id: &str) -> String {
        format!("favorites:{}", user_id)
    }
}

fn decode_reviews(raw: HashMap<String, String>) -> Vec<Review> {
    raw.into_iter()
        .filter_map(|(id, json)| match serde_json::from_str::<Review>(&json) {
            Ok(mut review) => {
                review.id = id;
                Some(review)
            }
            Err(e) => {
                warn!(review_id = %id, "Skipping malformed review record: {}", e);
                None
            }
        })
        .collect()
}

fn decode_user(mut raw: HashMap<String, String>) -> Option<UserProfile> {
    let username = raw.remove("username")?;
    let avatar = raw.get("avatar").and_then(|value| value.parse().ok());
    Some(UserProfile { username, avatar })
}

#[async_trait]
impl RecipeStore for RedisStore {
    async fn get_reviews_by_recipe_id(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(Self::reviews_key(recipe_id)).await?;

        debug!(recipe_id, count = raw.len(), "Fetched reviews from Redis");
        Ok(decode_reviews(raw))
    }

    async fn get_user_by_id(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        let mut conn = self.conn.clone();
        let raw: HashMap<String, String> = conn.hgetall(Self::user_key(user_id)).await?;
        Ok(decode_user(raw))
    }

    async fn get_favorite_marks(&self, user_id: &str) -> StoreResult<HashSet<String>> {
        let mut conn = self.conn.clone();
        let marks: HashSet<String> = conn.smembers(Self::favorites_key(user_id)).await?;
        Ok(marks)
    }

    async fn push_review(&self, mut review: Review) -> StoreResult<String> {
        if review.id.is_empty() {
            review.id = Uuid::new_v4().to_string();
        }
        let payload = serde_json::to_string(&review)?;

        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(Self::reviews_key(&review.recipe_id), &review.id, payload)
            .await?;

        Ok(review.id)
    }

    async fn set_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.sadd::<_, _, ()>(Self::favorites_key(user_id), recipe_id)
            .await?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.srem::<_, _, ()>(Self::favorites_key(user_id), recipe_id)
            .await?;
        Ok(())
    }

    async fn is_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let member: bool = conn
            .sismember(Self::favorites_key(user_id), recipe_id)
            .await?;
        Ok(member)
    }
}
