//! Subscription surface.
//!
//! During the free beta the entitlement check short-circuits to active for
//! every account in good standing; the endpoint reports the bypass so
//! clients can label the state honestly.

use axum::{extract::State, Json};
use cinegrok_core::SubscriptionSummary;

use crate::extractors::AuthContext;
use crate::response::ApiError;
use crate::state::AppState;

/// GET /v1/billing/subscription - Current tier, status, and entitlement.
pub async fn subscription_handler(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<SubscriptionSummary>, ApiError> {
    let account = &auth.account;

    Ok(Json(SubscriptionSummary {
        tier: account.tier,
        status: account.status,
        entitled: account.is_entitled(state.site.beta_bypass),
        beta_bypass: state.site.beta_bypass,
    }))
}
