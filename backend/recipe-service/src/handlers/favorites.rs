/// Favorites endpoints
use actix_web::{get, put, web, HttpRequest, HttpResponse};

use super::session_from_request;
use crate::context::SessionContext;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Favorites are private: the path user must be the session user
fn ensure_own_favorites(session: &SessionContext, user_id: &str) -> Result<()> {
    let current = session.require_user("view favorites")?;
    if current != user_id {
        return Err(AppError::Forbidden(
            "cannot access another user's favorites".into(),
        ));
    }
    Ok(())
}

/// GET /api/v1/users/{user_id}/favorites
#[get("/api/v1/users/{user_id}/favorites")]
pub async fn list_favorites(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let session = session_from_request(&req);
    ensure_own_favorites(&session, &path)?;

    let recipes = state.favorites.favorites(&session, &state.catalog).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "items": recipes,
        "count": recipes.len(),
    })))
}

/// PUT /api/v1/users/{user_id}/favorites/{recipe_id}
///
/// Toggles the mark and returns the new state.
#[put("/api/v1/users/{user_id}/favorites/{recipe_id}")]
pub async fn toggle_favorite(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (user_id, recipe_id) = path.into_inner();
    let session = session_from_request(&req);
    ensure_own_favorites(&session, &user_id)?;

    let favorite = state
        .favorites
        .toggle_favorite(&session, &state.catalog, &recipe_id)
        .await?;
    Ok(HttpResponse::Ok().json(favorite))
}
