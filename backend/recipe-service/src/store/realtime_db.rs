use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::{RecipeStore, StoreResult};
use crate::models::{Review, UserProfile};

/// Client for the hosted realtime database's REST API.
///
/// Paths mirror the mobile app's tree: `/reviews/{push_id}`,
/// `/users/{uid}` and `/favorites/{uid}/{recipe_id} = true`.
#[derive(Clone)]
pub struct RealtimeDbStore {
    client: Client,
    base_url: String,
    auth: Option<String>,
}

#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

impl RealtimeDbStore {
    pub fn new(client: Client, base_url: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(token) => request.query(&[("auth", token.as_str())]),
            None => request,
        }
    }
}

/// A missing node comes back as JSON `null`. Malformed records are skipped.
fn reviews_from_snapshot(snapshot: Option<HashMap<String, Value>>) -> Vec<Review> {
    snapshot
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(id, record)| match serde_json::from_value::<Review>(record) {
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

/// Only marks explicitly set to `true` count as favorites
fn marks_from_snapshot(snapshot: Option<HashMap<String, Value>>) -> HashSet<String> {
    snapshot
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, flag)| flag.as_bool() == Some(true))
        .map(|(recipe_id, _)| recipe_id)
        .collect()
}

#[async_trait]
impl RecipeStore for RealtimeDbStore {
    async fn get_reviews_by_recipe_id(&self, recipe_id: &str) -> StoreResult<Vec<Review>> {
        let equal_to = format!("\"{}\"", recipe_id);
        let snapshot: Option<HashMap<String, Value>> = self
            .with_auth(self.client.get(self.url("reviews")))
            .query(&[("orderBy", "\"recipeId\""), ("equalTo", equal_to.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let reviews = reviews_from_snapshot(snapshot);
        debug!(recipe_id, count = reviews.len(), "Fetched reviews from realtime db");
        Ok(reviews)
    }

    async fn get_user_by_id(&self, user_id: &str) -> StoreResult<Option<UserProfile>> {
        let profile: Option<UserProfile> = self
            .with_auth(self.client.get(self.url(&format!("users/{}", user_id))))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(profile)
    }

    async fn get_favorite_marks(&self, user_id: &str) -> StoreResult<HashSet<String>> {
        let snapshot: Option<HashMap<String, Value>> = self
            .with_auth(self.client.get(self.url(&format!("favorites/{}", user_id))))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(marks_from_snapshot(snapshot))
    }

    async fn push_review(&self, review: Review) -> StoreResult<String> {
        let mut body = serde_json::to_value(&review)?;
        if let Value::Object(fields) = &mut body {
            fields.remove("id");
        }

        if review.id.is_empty() {
            let pushed: PushResponse = self
                .with_auth(self.client.post(self.url("reviews")))
                .json(&body)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
            return Ok(pushed.name);
        }

        self.with_auth(self.client.put(self.url(&format!("reviews/{}", review.id))))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(review.id)
    }

    async fn set_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        self.with_auth(
            self.client
                .put(self.url(&format!("favorites/{}/{}", user_id, recipe_id))),
        )
        .json(&true)
        .send()
        .await?
        .error_for_status()?;
        Ok(())
    }

    async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<()> {
        self.with_auth(
            self.client
                .delete(self.url(&format!("favorites/{}/{}", user_id, recipe_id))),
        )
        .send()
        .await?
        .error_for_status()?;
        Ok(())
    }

    async fn is_favorite(&self, user_id: &str, recipe_id: &str) -> StoreResult<bool> {
        let flag: Option<Value> = self
            .with_auth(
                self.client
                    .get(self.url(&format!("favorites/{}/{}", user_id, recipe_id))),
            )
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(flag.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_strips_trailing_slash() {
        let store = RealtimeDbStore::new(Client::new(), "https://example.firebaseio.com/", None);
        assert_eq!(
            store.url("reviews"),
            "https://example.firebaseio.com/reviews.json"
        );
    }

    #[test]
    fn test_reviews_from_snapshot() {
        let json = r#"{
            "-Oa1": {"recipeId":"adobo","userId":"u1","rating":4,"comment":"ok","date":"02/02/2025"},
            "-Oa2": {"recipeId":"adobo","userId":"u2","rating":2,"date":"02/03/2025"}
        }"#;
        let snapshot: Option<HashMap<String, Value>> = serde_json::from_str(json).unwrap();
        let mut reviews = reviews_from_snapshot(snapshot);
        reviews.sort_by(|a, b| a.id.cmp(&b.id));

        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, "-Oa1");
        assert_eq!(reviews[1].comment, "");

        let empty: Option<HashMap<String, Value>> = serde_json::from_str("null").unwrap();
        assert!(reviews_from_snapshot(empty).is_empty());
    }

    #[test]
    fn test_malformed_record_does_not_drop_siblings() {
        let json = r#"{
            "-Oa1": {"recipeId":"adobo","userId":"u1","rating":5,"comment":"ok","date":"02/02/2025"},
            "-Oa2": {"recipeId":"adobo","userId":"u2","rating":4.5,"date":"02/03/2025"},
            "-Oa3": {"recipeId":"adobo","userId":"u3","rating":3}
        }"#;
        let snapshot: Option<HashMap<String, Value>> = serde_json::from_str(json).unwrap();
        let reviews = reviews_from_snapshot(snapshot);

        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].id, "-Oa1");
        assert_eq!(reviews[0].rating, 5);
    }

    #[test]
    fn test_marks_require_true_flag() {
        let snapshot: Option<HashMap<String, Value>> =
            serde_json::from_str(r#"{"adobo": true, "sinigang": false, "lumpia": "yes"}"#).unwrap();
        let marks = marks_from_snapshot(snapshot);

        assert_eq!(marks.len(), 1);
        assert!(marks.contains("adobo"));
    }
}
