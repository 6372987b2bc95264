//! API routes.

pub mod accounts;
pub mod billing;
pub mod bio;
pub mod bookmarks;
pub mod health;
pub mod profiles;
pub mod stats;
pub mod track;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/accounts", post(accounts::signup_handler))
        .route("/v1/billing/subscription", get(billing::subscription_handler))
        .route(
            "/v1/profiles",
            post(profiles::create_handler).get(profiles::list_handler),
        )
        .route("/v1/profiles/import", post(profiles::import_handler))
        .route(
            "/v1/profiles/:id",
            get(profiles::get_handler)
                .put(profiles::update_handler)
                .delete(profiles::delete_handler),
        )
        .route("/v1/profiles/:id/bio", post(bio::generate_handler))
        .route("/v1/profiles/:id/stats", get(stats::stats_handler))
        .route("/v1/filmmakers/:slug", get(profiles::public_handler))
        .route("/v1/track", post(track::track_handler))
        .route("/v1/bookmarks", get(bookmarks::list_handler))
        .route(
            "/v1/bookmarks/:filmmaker_id",
            post(bookmarks::add_handler).delete(bookmarks::remove_handler),
        )
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
