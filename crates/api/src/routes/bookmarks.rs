//! Collaboration-interest bookmarks.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cinegrok_store::Bookmark;
use uuid::Uuid;

use crate::extractors::AuthContext;
use crate::response::ApiError;
use crate::state::AppState;

/// POST /v1/bookmarks/:filmmaker_id - Save a filmmaker. Idempotent.
pub async fn add_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(filmmaker_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    state
        .rate_limiter
        .enforce("general", auth.api_key.as_str())?;

    // Only published filmmakers can be bookmarked.
    state
        .store
        .get_profile(filmmaker_id)?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found(format!("profile {}", filmmaker_id)))?;

    let bookmark = state.store.add_bookmark(auth.account.id, filmmaker_id)?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// DELETE /v1/bookmarks/:filmmaker_id - Remove a saved filmmaker.
pub async fn remove_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(filmmaker_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.store.remove_bookmark(auth.account.id, filmmaker_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!(
            "no bookmark for {}",
            filmmaker_id
        )))
    }
}

/// GET /v1/bookmarks - List saved filmmakers, newest first.
pub async fn list_handler(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = state.store.list_bookmarks(auth.account.id)?;
    Ok(Json(bookmarks))
}
