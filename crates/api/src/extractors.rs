//! Request extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use cinegrok_core::{extract_api_key, Account, ParsedApiKey};
use cinegrok_telemetry::metrics;

use crate::response::ApiError;
use crate::state::AppState;

/// Authenticated context from request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated API key
    pub api_key: ParsedApiKey,
    /// Resolved account
    pub account: Account,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let api_key_header = parts.headers.get("X-API-Key").and_then(|h| h.to_str().ok());

        let result = async {
            let api_key = extract_api_key(auth_header, api_key_header)?;
            let account = state.authenticate(&api_key).await?;
            Ok::<_, cinegrok_core::Error>(AuthContext { api_key, account })
        }
        .await;

        result.map_err(|err| {
            metrics().auth_failures.inc();
            ApiError::from(err)
        })
    }
}

/// Client IP address.
#[derive(Debug, Clone)]
pub struct ClientIp(pub Option<String>);

impl ClientIp {
    /// Rate-limit key for this client. Unknown clients share one bucket.
    pub fn key(&self) -> &str {
        self.0.as_deref().unwrap_or("unknown")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Try X-Forwarded-For first (for proxied requests)
        if let Some(xff) = parts.headers.get("X-Forwarded-For") {
            if let Ok(xff_str) = xff.to_str() {
                // Take the first IP in the chain
                if let Some(ip) = xff_str.split(',').next() {
                    return Ok(ClientIp(Some(ip.trim().to_string())));
                }
            }
        }

        // Try X-Real-IP
        if let Some(real_ip) = parts.headers.get("X-Real-IP") {
            if let Ok(ip) = real_ip.to_str() {
                return Ok(ClientIp(Some(ip.to_string())));
            }
        }

        Ok(ClientIp(None))
    }
}
