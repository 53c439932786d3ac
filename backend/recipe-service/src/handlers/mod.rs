/// HTTP API handlers
///
/// The presentation layer's entry points. Authentication is done upstream by
/// the auth provider; the uid it vouches for arrives in `X-User-Id`.
use actix_web::{get, web, HttpRequest, HttpResponse};

use crate::context::SessionContext;
use crate::state::AppState;

pub mod favorites;
pub mod recipes;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const DARK_MODE_HEADER: &str = "x-dark-mode";

/// Builds the caller's session from request headers
pub fn session_from_request(req: &HttpRequest) -> SessionContext {
    let headers = req.headers();

    let dark_mode = headers
        .get(DARK_MODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| matches!(value.trim(), "1" | "true" | "on"));

    let session = match headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        Some(user_id) => SessionContext::logged_in(user_id),
        None => SessionContext::anonymous(),
    };

    session.with_dark_mode(dark_mode)
}

/// GET /health
#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "recipes": state.catalog.len(),
        "fetch_strategy": state.trending.strategy(),
    }))
}

/// Registers every route. Literal recipe paths come before `{recipe_id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(recipes::list_recipes)
        .service(recipes::get_trending)
        .service(recipes::get_ratings)
        .service(recipes::get_recipe)
        .service(recipes::get_reviews)
        .service(recipes::publish_review)
        .service(favorites::list_favorites)
        .service(favorites::toggle_favorite);
}
