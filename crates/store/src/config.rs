//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the embedded store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file path.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/cinegrok.redb".to_string(),
        }
    }
}
