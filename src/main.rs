//! CineGrok filmmaker directory service
//!
//! HTTP API for filmmaker profiles:
//! - Profile CRUD, bulk import, and public browsing
//! - Deterministic bio generation from profile fields
//! - Per-profile analytics tracking with daily rollups
//! - Account/API-key auth with a beta-bypassed subscription surface

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use cinegrok_api::{router, AppState, SiteConfig};
use cinegrok_store::{Store, StoreConfig};
use cinegrok_telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Own domain for same-site referrer classification
    #[serde(default = "default_own_domain")]
    own_domain: String,

    /// While true, entitlement checks treat every active account as paid
    #[serde(default = "default_beta_bypass")]
    beta_bypass: bool,

    #[serde(default)]
    store: StoreConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_own_domain() -> String {
    "cinegrok.com".to_string()
}

fn default_beta_bypass() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            own_domain: default_own_domain(),
            beta_bypass: default_beta_bypass(),
            store: StoreConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting CineGrok v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Open the embedded store
    let store = match Store::open(&config.store) {
        Ok(store) => {
            health().store.set_healthy();
            info!(path = %config.store.path, "Store: healthy");
            Arc::new(store)
        }
        Err(e) => {
            health().store.set_unhealthy(e.to_string());
            error!("Failed to open store: {}", e);
            return Err(anyhow::anyhow!(e).context("Failed to open store"));
        }
    };

    // Create application state
    let site = SiteConfig {
        own_domain: config.own_domain.clone(),
        beta_bypass: config.beta_bypass,
    };
    let state = AppState::new(store, site);

    // Start rate limiter cleanup background task
    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("CINEGROK")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(path) = std::env::var("CINEGROK_STORE_PATH") {
        config.store.path = path;
    }
    if let Ok(domain) = std::env::var("CINEGROK_OWN_DOMAIN") {
        config.own_domain = domain;
    }
    if let Ok(bypass) = std::env::var("CINEGROK_BETA_BYPASS") {
        config.beta_bypass = bypass == "1" || bypass.to_lowercase() == "true";
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
