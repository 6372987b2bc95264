//! Integration test support: shared context and fixtures.

pub mod fixtures;
pub mod setup;
