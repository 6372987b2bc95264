//! Analytics tracking endpoint.
//!
//! Fired by the public profile pages on view and on outbound clicks.
//! Tracking is best-effort: a store failure is logged and reported as
//! `accepted: false`, it never turns into a 5xx for the visitor.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use cinegrok_core::{classify_device, classify_referrer, ClickType};
use cinegrok_telemetry::metrics;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::extractors::ClientIp;
use crate::response::{ApiError, TrackResponse};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrackEvent {
    View,
    Click,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub profile_id: Uuid,
    pub event: TrackEvent,
    /// Required for click events.
    pub click_type: Option<ClickType>,
}

/// POST /v1/track - Record one view or click against a profile's daily rollup.
pub async fn track_handler(
    State(state): State<AppState>,
    client_ip: ClientIp,
    headers: HeaderMap,
    Json(request): Json<TrackRequest>,
) -> Result<Json<TrackResponse>, ApiError> {
    let start = Instant::now();
    state.rate_limiter.enforce("track", client_ip.key())?;

    if request.event == TrackEvent::Click && request.click_type.is_none() {
        return Err(ApiError::bad_request("clickType is required for click events"));
    }

    // Untracked targets (missing or unpublished) are dropped, not revealed.
    let profile = match state.store.get_profile(request.profile_id) {
        Ok(profile) => profile,
        Err(e) => {
            metrics().track_failures.inc();
            warn!(profile_id = %request.profile_id, error = %e, "Store lookup failed during tracking");
            return Ok(Json(TrackResponse { accepted: false }));
        }
    };
    let Some(profile) = profile.filter(|p| p.published) else {
        debug!(profile_id = %request.profile_id, "Track event for unknown profile, dropped");
        return Ok(Json(TrackResponse { accepted: false }));
    };

    let today = Utc::now().date_naive();
    let result = match request.event {
        TrackEvent::View => {
            let referrer = headers
                .get(header::REFERER)
                .and_then(|h| h.to_str().ok());
            let user_agent = headers
                .get(header::USER_AGENT)
                .and_then(|h| h.to_str().ok())
                .unwrap_or_default();

            let referrer_category = classify_referrer(referrer, &state.site.own_domain);
            let device = classify_device(user_agent);

            state
                .store
                .record_view(profile.id, today, referrer_category, device)
        }
        TrackEvent::Click => {
            // Presence checked above
            let click_type = request.click_type.unwrap_or(ClickType::Website);
            state.store.record_click(profile.id, today, click_type)
        }
    };

    let accepted = match result {
        Ok(()) => {
            match request.event {
                TrackEvent::View => metrics().views_tracked.inc(),
                TrackEvent::Click => metrics().clicks_tracked.inc(),
            }
            true
        }
        Err(e) => {
            metrics().track_failures.inc();
            warn!(profile_id = %profile.id, error = %e, "Failed to record track event");
            false
        }
    };

    metrics()
        .track_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    Ok(Json(TrackResponse { accepted }))
}
