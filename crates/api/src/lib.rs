//! HTTP API layer for the filmmaker directory.

pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::{AppState, SiteConfig};
