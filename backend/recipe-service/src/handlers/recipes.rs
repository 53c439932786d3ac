/// Recipe, rating and review endpoints
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::session_from_request;
use crate::catalog::CategoryFilter;
use crate::error::{AppError, Result};
use crate::models::{AggregateRating, NewReview, Recipe, MAX_RATING};
use crate::services::{aggregate, TrendingOptions};
use crate::state::AppState;

/// Query parameters for GET /api/v1/recipes
#[derive(Debug, Deserialize)]
pub struct RecipeListQuery {
    /// "Meal" or a single category name
    pub category: Option<String>,
}

/// Query parameters for GET /api/v1/recipes/trending
#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    pub threshold: Option<f64>,
    pub limit: Option<usize>,
}

impl TrendingQuery {
    fn resolve(&self, defaults: TrendingOptions) -> Result<TrendingOptions> {
        let threshold = self.threshold.unwrap_or(defaults.threshold);
        if !threshold.is_finite() || !(0.0..=f64::from(MAX_RATING)).contains(&threshold) {
            return Err(AppError::InvalidInput(format!(
                "threshold must be between 0 and {}",
                MAX_RATING
            )));
        }

        Ok(TrendingOptions {
            threshold,
            limit: self.limit.unwrap_or(defaults.limit),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    pub recipe: Recipe,
    pub rating: AggregateRating,
    pub display_rating: Option<String>,
    pub is_favorite: bool,
    /// Theme the caller asked for, echoed so the detail screen can render it
    pub dark_mode: bool,
}

/// GET /api/v1/recipes
#[get("/api/v1/recipes")]
pub async fn list_recipes(
    query: web::Query<RecipeListQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let recipes = match query.category.as_deref() {
        Some(category) => state.catalog.by_category(category.parse::<CategoryFilter>()?),
        None => state.catalog.all().to_vec(),
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": recipes,
        "count": recipes.len(),
    })))
}

/// GET /api/v1/recipes/trending
#[get("/api/v1/recipes/trending")]
pub async fn get_trending(
    query: web::Query<TrendingQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let options = query.resolve(state.trending_defaults)?;
    debug!(
        threshold = options.threshold,
        limit = options.limit,
        "Trending request"
    );

    let items = state
        .trending
        .select_trending(state.catalog.all(), options)
        .await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": items,
        "count": items.len(),
        "threshold": options.threshold,
        "limit": options.limit,
    })))
}

/// GET /api/v1/recipes/ratings
#[get("/api/v1/recipes/ratings")]
pub async fn get_ratings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let ratings = state.trending.ratings_map(state.catalog.all()).await;
    Ok(HttpResponse::Ok().json(ratings))
}

/// GET /api/v1/recipes/{recipe_id}
#[get("/api/v1/recipes/{recipe_id}")]
pub async fn get_recipe(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let recipe_id = path.into_inner();
    let recipe = state
        .catalog
        .get(&recipe_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("recipe {}", recipe_id)))?;

    let session = session_from_request(&req);
    let reviews = state.fetcher.fetch_reviews(&recipe_id).await?;
    let rating = aggregate(&reviews);
    let is_favorite = state.favorites.is_favorite(&session, &recipe_id).await?;

    Ok(HttpResponse::Ok().json(RecipeDetailResponse {
        recipe,
        display_rating: rating.display(),
        rating,
        is_favorite,
        dark_mode: session.dark_mode(),
    }))
}

/// GET /api/v1/recipes/{recipe_id}/reviews
#[get("/api/v1/recipes/{recipe_id}/reviews")]
pub async fn get_reviews(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let recipe_id = path.into_inner();
    if !state.catalog.contains(&recipe_id) {
        return Err(AppError::NotFound(format!("recipe {}", recipe_id)));
    }

    let reviews = state.reviews.reviews_with_authors(&recipe_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": reviews,
        "count": reviews.len(),
    })))
}

/// POST /api/v1/recipes/{recipe_id}/reviews
#[post("/api/v1/recipes/{recipe_id}/reviews")]
pub async fn publish_review(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<NewReview>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let session = session_from_request(&req);
    let review = state
        .reviews
        .publish(&session, &path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(review))
}
