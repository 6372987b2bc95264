//! Internal telemetry for the filmmaker directory.
//!
//! In-process counters and health state, exposed over the service's own
//! debug endpoints rather than an external metrics system.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
