//! Bio generation endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use cinegrok_core::generate_bio;
use cinegrok_telemetry::metrics;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::extractors::AuthContext;
use crate::response::ApiError;
use crate::routes::profiles::require_owner;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BioResponse {
    pub profile_id: Uuid,
    pub bio: String,
}

/// POST /v1/profiles/:id/bio - Regenerate the profile biography from its
/// current fields and store it. Deterministic: same fields, same bio.
pub async fn generate_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<BioResponse>, ApiError> {
    state
        .rate_limiter
        .enforce("bio", &auth.account.id.to_string())?;

    let profile = state.store.require_profile(id)?;
    require_owner(&profile, &auth)?;

    let bio = generate_bio(&profile.fields);
    state.store.set_profile_bio(id, bio.clone())?;

    metrics().bios_generated.inc();
    info!(profile_id = %id, "Bio generated");

    Ok(Json(BioResponse {
        profile_id: id,
        bio,
    }))
}
