//! Core types, schemas, and pure directory logic for CineGrok.

pub mod analytics;
pub mod auth;
pub mod bio;
pub mod completeness;
pub mod error;
pub mod limits;
pub mod plan;
pub mod profile;

pub use analytics::*;
pub use auth::*;
pub use bio::*;
pub use completeness::*;
pub use error::{Error, Result};
pub use plan::*;
pub use profile::*;
