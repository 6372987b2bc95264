//! Per-profile analytics stats (owner only).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Days, NaiveDate, Utc};
use cinegrok_core::{
    calculate_completeness, calculate_ctr, calculate_trend_change, improvement_tips,
    limits::MAX_STATS_DAYS,
};
use cinegrok_store::DailyRollup;
use cinegrok_telemetry::metrics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

use crate::extractors::AuthContext;
use crate::response::ApiError;
use crate::routes::profiles::require_owner;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub days: Option<u32>,
}

/// One day in the stats series.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub date: NaiveDate,
    pub views: u64,
    pub clicks: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Window length actually used, after tier capping.
    pub days: u32,
    pub views: u64,
    pub clicks: u64,
    /// Click-through rate percentage, one decimal.
    pub ctr: f64,
    /// Percent change vs the preceding window of equal length.
    pub views_trend: i64,
    pub clicks_trend: i64,
    pub referrers: HashMap<String, u64>,
    pub devices: HashMap<String, u64>,
    pub click_types: HashMap<String, u64>,
    pub daily: Vec<DailyStat>,
    pub completeness: u8,
    pub tips: Vec<String>,
}

const DEFAULT_STATS_DAYS: u32 = 30;

/// GET /v1/profiles/:id/stats?days=N - Rollup totals, trends, and profile
/// health for an owned profile.
pub async fn stats_handler(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(id): Path<Uuid>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ApiError> {
    let start = Instant::now();
    metrics().stats_requests.inc();

    let profile = state.store.require_profile(id)?;
    require_owner(&profile, &auth)?;

    let tier_cap = state.effective_tier(&auth.account).stats_window_days();
    let days = query
        .days
        .unwrap_or(DEFAULT_STATS_DAYS)
        .clamp(1, MAX_STATS_DAYS)
        .min(tier_cap);

    let today = Utc::now().date_naive();
    let span = Days::new(days as u64 - 1);
    let current_start = today - span;

    // Preceding window of equal length, ending the day before this one starts.
    let previous_end = current_start - Days::new(1);
    let previous_start = previous_end - span;

    let current = state.store.rollups_in_range(id, current_start, today)?;
    let previous = state
        .store
        .rollups_in_range(id, previous_start, previous_end)?;

    let (views, clicks) = totals(&current);
    let (prev_views, prev_clicks) = totals(&previous);

    let mut referrers: HashMap<String, u64> = HashMap::new();
    let mut devices: HashMap<String, u64> = HashMap::new();
    let mut click_types: HashMap<String, u64> = HashMap::new();
    for rollup in &current {
        for (category, count) in &rollup.referrers {
            *referrers.entry(category.as_str().to_string()).or_insert(0) += count;
        }
        for (category, count) in &rollup.devices {
            *devices.entry(category.as_str().to_string()).or_insert(0) += count;
        }
        for (kind, count) in &rollup.click_types {
            *click_types.entry(kind.as_str().to_string()).or_insert(0) += count;
        }
    }

    let daily = current
        .iter()
        .map(|r| DailyStat {
            date: r.date,
            views: r.views,
            clicks: r.clicks,
        })
        .collect();

    let response = StatsResponse {
        days,
        views,
        clicks,
        ctr: calculate_ctr(views, clicks),
        views_trend: calculate_trend_change(views, prev_views),
        clicks_trend: calculate_trend_change(clicks, prev_clicks),
        referrers,
        devices,
        click_types,
        daily,
        completeness: calculate_completeness(&profile.fields),
        tips: improvement_tips(&profile.fields),
    };

    metrics()
        .stats_latency_ms
        .observe(start.elapsed().as_millis() as u64);

    Ok(Json(response))
}

fn totals(rollups: &[DailyRollup]) -> (u64, u64) {
    rollups
        .iter()
        .fold((0, 0), |(v, c), r| (v + r.views, c + r.clicks))
}
