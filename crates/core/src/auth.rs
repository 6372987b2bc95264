//! API key parsing and header extraction.
//!
//! Keys are issued at signup and presented on every authenticated request.
//! Format: `cgk_(live|test)_` followed by 32 alphanumerics.

use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::{AuthErrorCode, Error, Result};
use crate::limits::API_KEY_PATTERN;

/// Compiled API key regex (lazy initialization).
static API_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(API_KEY_PATTERN).expect("invalid API key pattern"));

/// API key environment: live or test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyEnv {
    Live,
    Test,
}

impl ApiKeyEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Test => "test",
        }
    }
}

/// Parsed and validated API key from a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedApiKey {
    /// Raw key string.
    raw: String,
    /// Environment (live/test).
    env: ApiKeyEnv,
}

impl ParsedApiKey {
    /// Parse and validate an API key.
    ///
    /// Format: `cgk_(live|test)_[a-zA-Z0-9]{32}`
    pub fn parse(key: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::auth(AuthErrorCode::MissingKey, "API key is required"));
        }

        if !API_KEY_REGEX.is_match(key) {
            return Err(Error::auth(
                AuthErrorCode::InvalidFormat,
                "Invalid API key format",
            ));
        }

        let env = if key.starts_with("cgk_live_") {
            ApiKeyEnv::Live
        } else {
            ApiKeyEnv::Test
        };

        Ok(Self {
            raw: key.to_string(),
            env,
        })
    }

    /// Get the raw key string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Get the key environment.
    pub fn env(&self) -> ApiKeyEnv {
        self.env
    }

    /// Check if this is a live key.
    pub fn is_live(&self) -> bool {
        self.env == ApiKeyEnv::Live
    }
}

/// Generate a fresh API key for the given environment.
///
/// UUIDv4 in simple form supplies the 32 alphanumeric characters.
pub fn generate_api_key(env: ApiKeyEnv) -> String {
    format!("cgk_{}_{}", env.as_str(), Uuid::new_v4().simple())
}

/// Extract an API key from request headers.
///
/// Checks in order:
/// 1. `Authorization: Bearer <key>`
/// 2. `X-API-Key: <key>`
pub fn extract_api_key(
    auth_header: Option<&str>,
    api_key_header: Option<&str>,
) -> Result<ParsedApiKey> {
    if let Some(auth) = auth_header {
        if let Some(key) = auth.strip_prefix("Bearer ") {
            return ParsedApiKey::parse(key.trim());
        }
    }

    if let Some(key) = api_key_header {
        return ParsedApiKey::parse(key.trim());
    }

    Err(Error::auth(AuthErrorCode::MissingKey, "API key is required"))
}
