//! Profile CRUD, public listing, and bulk import.
//!
//! Bulk import accepts three payload shapes:
//! 1. Array: `[profile, profile, ...]`
//! 2. Wrapper object: `{ "profiles": [...] }`
//! 3. Single profile object
//!
//! Entries validate independently; the response reports accepted and
//! rejected counts with per-entry errors.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use cinegrok_core::error::ValidationErrorCode;
use cinegrok_core::{
    limits::MAX_IMPORT_SIZE_BYTES, validate_batch, validate_submission, Error, FilmmakerProfile,
    ImportPayload, ProfileFields, ProfileSubmission,
};
use cinegrok_telemetry::metrics;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extractors::{AuthContext, ClientIp};
use crate::response::{ApiError, ImportResponse};
use crate::state::AppState;

/// Public projection of a profile: everything a directory visitor sees,
/// nothing about the owning account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub slug: String,
    #[serde(flatten)]
    pub fields: ProfileFields,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<FilmmakerProfile> for PublicProfile {
    fn from(profile: FilmmakerProfile) -> Self {
        Self {
            id: profile.id,
            slug: profile.slug,
            fields: profile.fields,
            bio: profile.bio,
            created_at: profile.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListResponse {
    pub profiles: Vec<PublicProfile>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// Ownership gate shared by the mutating profile routes.
pub(crate) fn require_owner(
    profile: &FilmmakerProfile,
    auth: &AuthContext,
) -> Result<(), ApiError> {
    if profile.owner_id != auth.account.id {
        return Err(ApiError::forbidden("You do not own this profile"));
    }
    Ok(())
}

/// POST /v1/profiles - Create a profile.
pub async fn create_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(submission): Json<ProfileSubmission>,
) -> Result<(StatusCode, Json<FilmmakerProfile>), ApiError> {
    state
        .rate_limiter
        .enforce("general", auth.api_key.as_str())?;

    validate_submission(&submission)?;
    check_profile_capacity(&state, &auth, 1)?;

    let published = submission.published.unwrap_or(false);
    let profile = state
        .store
        .create_profile(auth.account.id, submission.fields, published)?;

    metrics().profiles_created.inc();
    info!(profile_id = %profile.id, slug = %profile.slug, "Profile created");

    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /v1/profiles - Public listing of published profiles.
pub async fn list_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    state.rate_limiter.enforce("general", client_ip.key())?;

    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let page = state.store.list_published(query.offset, limit)?;

    Ok(Json(ProfileListResponse {
        profiles: page.profiles.into_iter().map(PublicProfile::from).collect(),
        total: page.total,
        offset: query.offset,
        limit,
    }))
}

/// GET /v1/profiles/:id - Fetch an owned profile, published or not.
pub async fn get_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<FilmmakerProfile>, ApiError> {
    let profile = state.store.require_profile(id)?;
    require_owner(&profile, &auth)?;
    Ok(Json(profile))
}

/// GET /v1/filmmakers/:slug - Public profile lookup by slug.
pub async fn public_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicProfile>, ApiError> {
    let profile = state
        .store
        .get_profile_by_slug(&slug)?
        .filter(|p| p.published)
        .ok_or_else(|| ApiError::not_found(format!("no filmmaker at '{}'", slug)))?;

    Ok(Json(PublicProfile::from(profile)))
}

/// PUT /v1/profiles/:id - Replace a profile's fields.
pub async fn update_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Json(submission): Json<ProfileSubmission>,
) -> Result<Json<FilmmakerProfile>, ApiError> {
    state
        .rate_limiter
        .enforce("general", auth.api_key.as_str())?;

    let existing = state.store.require_profile(id)?;
    require_owner(&existing, &auth)?;
    validate_submission(&submission)?;

    let updated = state
        .store
        .update_profile(id, submission.fields, submission.published)?;

    metrics().profiles_updated.inc();
    debug!(profile_id = %id, "Profile updated");

    Ok(Json(updated))
}

/// DELETE /v1/profiles/:id - Delete a profile.
pub async fn delete_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let existing = state.store.require_profile(id)?;
    require_owner(&existing, &auth)?;

    state.store.delete_profile(id)?;
    metrics().profiles_deleted.inc();
    info!(profile_id = %id, "Profile deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/profiles/import - Bulk import with partial success.
pub async fn import_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    body: Bytes,
) -> Result<Json<ImportResponse>, ApiError> {
    state
        .rate_limiter
        .enforce("general", auth.api_key.as_str())?;

    if body.len() > MAX_IMPORT_SIZE_BYTES {
        return Err(ApiError::validation(
            ValidationErrorCode::ImportTooLarge.code(),
            vec![format!(
                "Payload size {}KB exceeds {}KB limit",
                body.len() / 1024,
                MAX_IMPORT_SIZE_BYTES / 1024
            )],
        ));
    }

    let payload = ImportPayload::parse(&body).map_err(ApiError::from)?;
    let (valid, validation_errors) = validate_batch(payload.profiles)?;

    let mut errors: Vec<String> = validation_errors.iter().map(Error::to_string).collect();
    let capacity = remaining_capacity(&state, &auth)?;

    let mut accepted = 0usize;
    for submission in valid {
        if accepted >= capacity {
            errors.push("profile limit reached for your plan".to_string());
            continue;
        }
        let published = submission.published.unwrap_or(false);
        match state
            .store
            .create_profile(auth.account.id, submission.fields, published)
        {
            Ok(_) => accepted += 1,
            Err(e) => errors.push(e.to_string()),
        }
    }

    let rejected = errors.len();
    metrics().profiles_imported.inc_by(accepted as u64);
    metrics().import_rejections.inc_by(rejected as u64);

    if rejected > 0 {
        warn!(
            account_id = %auth.account.id,
            accepted = accepted,
            rejected = rejected,
            "Some import entries were rejected"
        );
    }
    info!(
        account_id = %auth.account.id,
        accepted = accepted,
        rejected = rejected,
        "Import processed"
    );

    Ok(Json(ImportResponse::new(accepted, errors)))
}

/// How many more profiles the account may create.
fn remaining_capacity(state: &AppState, auth: &AuthContext) -> Result<usize, ApiError> {
    let max = state.effective_tier(&auth.account).max_profiles();
    let owned = state.store.count_profiles_by_owner(auth.account.id)?;
    Ok(max.saturating_sub(owned))
}

fn check_profile_capacity(
    state: &AppState,
    auth: &AuthContext,
    needed: usize,
) -> Result<(), ApiError> {
    if remaining_capacity(state, auth)? < needed {
        return Err(ApiError::payment_required(
            "Profile limit reached for your plan",
        ));
    }
    Ok(())
}
